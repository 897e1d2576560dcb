///! CLI configuration management

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk configuration; both fields optional since flags and env can fill them in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: Option<String>,
    pub token: Option<String>,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&contents)?;

        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/scanalert/config.toml"))
    }
}

/// Fully resolved, validated settings the API client is built from
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: String,
    pub token: String,
}

impl Settings {
    /// Merge flag, environment, and file values (in that precedence) and
    /// require both fields to be present.
    pub fn resolve(
        flag_server: Option<String>,
        flag_token: Option<String>,
        config: Config,
    ) -> Result<Self> {
        let server = first_of(
            flag_server,
            std::env::var("SCANALERT_URL").ok(),
            config.server,
        )
        .ok_or_else(|| {
            anyhow::anyhow!(
                "no API server configured; set --server, SCANALERT_URL, or `server` in the config file"
            )
        })?;

        let token = first_of(
            flag_token,
            std::env::var("SCANALERT_TOKEN").ok(),
            config.token,
        )
        .ok_or_else(|| {
            anyhow::anyhow!(
                "no API token configured; set --token, SCANALERT_TOKEN, or `token` in the config file"
            )
        })?;

        Ok(Self {
            server: server.trim_end_matches('/').to_string(),
            token,
        })
    }
}

fn first_of(
    flag: Option<String>,
    env: Option<String>,
    file: Option<String>,
) -> Option<String> {
    flag.or(env).or(file).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_beats_env_and_file() {
        let merged = first_of(
            Some("from-flag".into()),
            Some("from-env".into()),
            Some("from-file".into()),
        );
        assert_eq!(merged.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_env_beats_file() {
        let merged = first_of(None, Some("from-env".into()), Some("from-file".into()));
        assert_eq!(merged.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_empty_values_do_not_count() {
        assert_eq!(first_of(None, None, Some(String::new())), None);
    }

    #[test]
    fn test_missing_server_is_an_error() {
        let err = Settings::resolve(None, Some("tok".into()), Config::default());
        // Only asserts when the env var is unset, which is the normal test environment
        if std::env::var("SCANALERT_URL").is_err() {
            assert!(err.is_err());
        }
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let settings = Settings::resolve(
            Some("https://secure.example.com/".into()),
            Some("tok".into()),
            Config::default(),
        )
        .unwrap();
        assert_eq!(settings.server, "https://secure.example.com");
    }
}
