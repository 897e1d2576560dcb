///! scanalert CLI
///!
///! One-shot reconciler: ensures every Kubernetes cluster known to the
///! monitoring platform has a runtime scanning alert scoped to it.

mod api;
mod commands;
mod config;
mod output;
mod platform;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::reconcile::ReconcileOptions;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// API server base URL (falls back to SCANALERT_URL or the config file)
    #[arg(short, long)]
    server: Option<String>,

    /// API token (falls back to SCANALERT_TOKEN or the config file)
    #[arg(short, long)]
    token: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: String,

    /// Path to an alternate config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing per-cluster scanning alerts
    Reconcile {
        /// Report what would be created without creating anything
        #[arg(long)]
        dry_run: bool,
        /// Keep processing remaining clusters when an alert creation fails
        #[arg(long)]
        keep_going: bool,
    },
    /// List Kubernetes clusters known to the platform
    Clusters,
    /// List existing scanning alerts
    Alerts,
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Reconcile { dry_run, keep_going } => {
            let api = build_client(&cli)?;
            let opts = ReconcileOptions {
                dry_run: *dry_run,
                keep_going: *keep_going,
            };
            commands::reconcile::handle_reconcile_command(&api, opts, &cli.output).await?
        }
        Commands::Clusters => {
            let api = build_client(&cli)?;
            commands::clusters::handle_clusters_command(&api, &cli.output).await?
        }
        Commands::Alerts => {
            let api = build_client(&cli)?;
            commands::alerts::handle_alerts_command(&api, &cli.output).await?
        }
        Commands::Completions { shell } => {
            generate_completions(*shell);
        }
    }

    Ok(())
}

/// Resolve configuration and construct the authenticated API client
fn build_client(cli: &Cli) -> Result<api::ApiClient> {
    let file_config = config::Config::load(cli.config.as_deref())?;
    let settings = config::Settings::resolve(cli.server.clone(), cli.token.clone(), file_config)?;
    Ok(api::ApiClient::new(&settings.server, &settings.token))
}

/// Generate shell completions
fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut io::stdout());
}
