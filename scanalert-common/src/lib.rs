//! Common types and matching logic shared between the scanalert CLI and its tests

use serde::{Deserialize, Serialize};

/// Metric key under which the metadata service reports cluster names
pub const CLUSTER_NAME_METRIC: &str = "kubernetes.cluster.name";

/// A Kubernetes cluster as reported by the metadata service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cluster {
    #[serde(rename = "kubernetes.cluster.name")]
    pub name: String,
}

/// An existing scanning alert; scope is the only key used for matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    #[serde(default)]
    pub name: String,
    // Alerts without a scope (e.g. global ones) come back with the field absent
    #[serde(default)]
    pub scope: String,
}

/// Response envelope of `GET /api/scanning/v1/alerts`
#[derive(Debug, Deserialize)]
pub struct AlertList {
    #[serde(default)]
    pub alerts: Vec<AlertRecord>,
}

/// Query body for `POST /api/data/entity/metadata`
#[derive(Debug, Clone, Serialize)]
pub struct MetadataQuery {
    pub paging: Paging,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Paging {
    pub from: u32,
    pub to: u32,
}

/// Metadata response; only `data` and the paging totals are consumed
#[derive(Debug, Deserialize)]
pub struct MetadataResult {
    #[serde(default)]
    pub data: Vec<Cluster>,
    pub paging: Option<MetadataPaging>,
}

#[derive(Debug, Deserialize)]
pub struct MetadataPaging {
    pub from: u32,
    pub to: u32,
    pub total: u32,
}

/// Creation payload for a per-cluster runtime scanning alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertPayload {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub name: String,
    pub description: String,
    pub scope: String,
    pub repositories: Vec<String>,
    pub triggers: AlertTriggers,
    pub autoscan: bool,
    #[serde(rename = "onlyPassFail")]
    pub only_pass_fail: bool,
    #[serde(rename = "notificationChannelIds")]
    pub notification_channel_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertTriggers {
    pub unscanned: bool,
    pub analysis_update: bool,
    pub vuln_update: bool,
    pub policy_eval: bool,
}

impl AlertPayload {
    /// Build the fixed runtime-scanning alert for a cluster
    pub fn runtime_for_cluster(cluster_name: &str) -> Self {
        Self {
            enabled: true,
            alert_type: "runtime".to_string(),
            name: format!("Cluster: {}", cluster_name),
            description: String::new(),
            scope: cluster_scope(cluster_name),
            repositories: Vec::new(),
            triggers: AlertTriggers {
                unscanned: true,
                analysis_update: false,
                vuln_update: true,
                policy_eval: true,
            },
            autoscan: false,
            only_pass_fail: false,
            notification_channel_ids: Vec::new(),
        }
    }
}

/// Errors from the platform API surface
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("API request failed: {status} - {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Canonical scope string for a cluster's scanning alert.
///
/// This is a literal substitution; the exact quoting and spacing is what
/// existing alerts are matched against, byte for byte.
pub fn cluster_scope(cluster_name: &str) -> String {
    format!("kubernetes.cluster.name = \"{}\"", cluster_name)
}

/// Whether at least one alert is scoped to the given cluster.
///
/// Exact string equality against the canonical scope, case-sensitive and
/// whitespace-sensitive. Semantically equivalent scopes written differently
/// do not match.
pub fn has_alert_for_cluster(alerts: &[AlertRecord], cluster_name: &str) -> bool {
    let scope = cluster_scope(cluster_name);
    alerts.iter().any(|alert| alert.scope == scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_scope_is_literal() {
        assert_eq!(
            cluster_scope("east-1"),
            "kubernetes.cluster.name = \"east-1\""
        );
        // No escaping beyond substitution, even for odd names
        assert_eq!(
            cluster_scope("a \"b\""),
            "kubernetes.cluster.name = \"a \"b\"\""
        );
    }

    #[test]
    fn test_matching_alert_is_found() {
        let alerts = vec![AlertRecord {
            name: "Cluster: east-1".to_string(),
            scope: "kubernetes.cluster.name = \"east-1\"".to_string(),
        }];
        assert!(has_alert_for_cluster(&alerts, "east-1"));
        assert!(!has_alert_for_cluster(&alerts, "west-2"));
    }

    #[test]
    fn test_matching_is_exact_not_semantic() {
        // Same meaning, no spaces around '=': must not match
        let alerts = vec![AlertRecord {
            name: "Cluster: east-1".to_string(),
            scope: "kubernetes.cluster.name=\"east-1\"".to_string(),
        }];
        assert!(!has_alert_for_cluster(&alerts, "east-1"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let alerts = vec![AlertRecord {
            name: "Cluster: East-1".to_string(),
            scope: "kubernetes.cluster.name = \"East-1\"".to_string(),
        }];
        assert!(!has_alert_for_cluster(&alerts, "east-1"));
    }

    #[test]
    fn test_scopeless_alerts_never_match() {
        let alerts = vec![AlertRecord {
            name: "Global unscanned images".to_string(),
            scope: String::new(),
        }];
        assert!(!has_alert_for_cluster(&alerts, "east-1"));
    }

    #[test]
    fn test_alert_payload_wire_format() {
        let payload = AlertPayload::runtime_for_cluster("east-1");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["enabled"], true);
        assert_eq!(json["type"], "runtime");
        assert_eq!(json["name"], "Cluster: east-1");
        assert_eq!(json["description"], "");
        assert_eq!(json["scope"], "kubernetes.cluster.name = \"east-1\"");
        assert_eq!(json["repositories"], serde_json::json!([]));
        assert_eq!(json["triggers"]["unscanned"], true);
        assert_eq!(json["triggers"]["analysis_update"], false);
        assert_eq!(json["triggers"]["vuln_update"], true);
        assert_eq!(json["triggers"]["policy_eval"], true);
        assert_eq!(json["autoscan"], false);
        assert_eq!(json["onlyPassFail"], false);
        assert_eq!(json["notificationChannelIds"], serde_json::json!([]));
    }

    #[test]
    fn test_metadata_result_deserialization() {
        let body = r#"{
            "metrics": ["kubernetes.cluster.name"],
            "time": {"from": 1720047000000000, "to": 1720068600000000, "sampling": 600000000},
            "data": [{"kubernetes.cluster.name": "east-1"}],
            "paging": {"from": 0, "to": 9999, "total": 1}
        }"#;
        let result: MetadataResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0].name, "east-1");
        assert_eq!(result.paging.as_ref().unwrap().total, 1);
    }

    #[test]
    fn test_alert_list_deserialization() {
        let body = r#"{"alerts":[{"enabled":true,"type":"runtime","name":"Cluster: east-1","description":"","scope":"kubernetes.cluster.name = \"east-1\"","repositories":[],"triggers":{"unscanned":true,"analysis_update":false,"vuln_update":true,"policy_eval":true},"autoscan":false,"onlyPassFail":false,"notificationChannelIds":[]}]}"#;
        let list: AlertList = serde_json::from_str(body).unwrap();
        assert_eq!(list.alerts.len(), 1);
        assert_eq!(list.alerts[0].name, "Cluster: east-1");
        assert_eq!(list.alerts[0].scope, "kubernetes.cluster.name = \"east-1\"");
    }

    #[test]
    fn test_alert_list_tolerates_empty_body_fields() {
        let list: AlertList = serde_json::from_str("{}").unwrap();
        assert!(list.alerts.is_empty());

        let list: AlertList = serde_json::from_str(r#"{"alerts":[{"name":"no scope"}]}"#).unwrap();
        assert_eq!(list.alerts[0].scope, "");
    }

    #[test]
    fn test_metadata_query_wire_format() {
        let query = MetadataQuery {
            paging: Paging { from: 0, to: 9999 },
            metrics: vec![CLUSTER_NAME_METRIC.to_string()],
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["paging"]["from"], 0);
        assert_eq!(json["paging"]["to"], 9999);
        assert_eq!(json["metrics"], serde_json::json!(["kubernetes.cluster.name"]));
    }
}
