use crate::api::ApiClient;
use crate::output::{self, OutputFormat};
use crate::platform::PlatformApi;
use anyhow::{Context, Result};
use scanalert_common::{has_alert_for_cluster, Cluster};
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct ClusterRow {
    name: String,
    #[tabled(rename = "alert")]
    has_alert: String,
}

impl ClusterRow {
    fn new(cluster: Cluster, has_alert: bool) -> Self {
        Self {
            name: cluster.name,
            has_alert: if has_alert { "yes" } else { "missing" }.to_string(),
        }
    }
}

pub async fn handle_clusters_command(api: &ApiClient, output_format: &str) -> Result<()> {
    let clusters = api
        .fetch_clusters()
        .await
        .context("retrieving cluster inventory")?;
    let alerts = api
        .fetch_alerts()
        .await
        .context("retrieving existing alerts")?;

    let rows: Vec<ClusterRow> = clusters
        .into_iter()
        .map(|cluster| {
            let has_alert = has_alert_for_cluster(&alerts, &cluster.name);
            ClusterRow::new(cluster, has_alert)
        })
        .collect();

    output::print_output(rows, OutputFormat::from_str(output_format))
}
