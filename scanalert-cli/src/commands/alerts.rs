use crate::api::ApiClient;
use crate::output::{self, OutputFormat};
use crate::platform::PlatformApi;
use anyhow::{Context, Result};
use scanalert_common::AlertRecord;
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct AlertRow {
    name: String,
    scope: String,
}

impl From<AlertRecord> for AlertRow {
    fn from(alert: AlertRecord) -> Self {
        Self {
            name: alert.name,
            scope: if alert.scope.is_empty() {
                "(global)".to_string()
            } else {
                alert.scope
            },
        }
    }
}

pub async fn handle_alerts_command(api: &ApiClient, output_format: &str) -> Result<()> {
    let alerts = api
        .fetch_alerts()
        .await
        .context("retrieving existing alerts")?;

    let rows: Vec<AlertRow> = alerts.into_iter().map(AlertRow::from).collect();
    output::print_output(rows, OutputFormat::from_str(output_format))
}
