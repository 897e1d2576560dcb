use crate::api::ApiClient;
use crate::output::{self, OutputFormat};
use crate::platform::PlatformApi;
use anyhow::{Context, Result};
use scanalert_common::{has_alert_for_cluster, AlertPayload};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Report what would be created without issuing creation calls
    pub dry_run: bool,
    /// Keep processing remaining clusters when a creation fails
    pub keep_going: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct ReconcileSummary {
    /// Clusters an alert was created for (or would be, under dry run)
    pub created: Vec<String>,
    /// Clusters that already had a matching alert
    pub skipped: Vec<String>,
    /// Creation failures; only ever non-empty under keep-going
    pub failed: Vec<ClusterFailure>,
}

#[derive(Debug, Serialize)]
pub struct ClusterFailure {
    pub cluster: String,
    pub error: String,
}

/// Ensure every cluster in the inventory has a runtime scanning alert.
///
/// Linear: fetch inventory, fetch alerts, then per cluster in inventory
/// order either skip (exact scope match) or create. A fetch failure aborts
/// before any creation; a creation failure aborts the run unless
/// `keep_going` is set.
pub async fn reconcile<A: PlatformApi>(
    api: &A,
    opts: &ReconcileOptions,
) -> Result<ReconcileSummary> {
    let clusters = api
        .fetch_clusters()
        .await
        .context("retrieving cluster inventory")?;
    let alerts = api
        .fetch_alerts()
        .await
        .context("retrieving existing alerts")?;

    log::info!(
        "reconciling {} clusters against {} existing alerts",
        clusters.len(),
        alerts.len()
    );

    let mut summary = ReconcileSummary::default();

    for cluster in clusters {
        if has_alert_for_cluster(&alerts, &cluster.name) {
            log::debug!("cluster '{}' already has a scanning alert", cluster.name);
            summary.skipped.push(cluster.name);
            continue;
        }

        if opts.dry_run {
            log::info!(
                "cluster '{}' has no scanning alert; dry run, not creating",
                cluster.name
            );
            summary.created.push(cluster.name);
            continue;
        }

        log::debug!("cluster '{}' has no scanning alert, creating", cluster.name);
        let payload = AlertPayload::runtime_for_cluster(&cluster.name);
        match api.create_alert(&payload).await {
            Ok(()) => summary.created.push(cluster.name),
            Err(err) if opts.keep_going => {
                log::error!(
                    "could not create alert for cluster '{}': {}",
                    cluster.name,
                    err
                );
                summary.failed.push(ClusterFailure {
                    cluster: cluster.name,
                    error: err.to_string(),
                });
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("creating alert for cluster '{}'", cluster.name)));
            }
        }
    }

    Ok(summary)
}

pub async fn handle_reconcile_command(
    api: &ApiClient,
    opts: ReconcileOptions,
    output_format: &str,
) -> Result<()> {
    let summary = reconcile(api, &opts).await?;
    let format = OutputFormat::from_str(output_format);

    match format {
        OutputFormat::Table => {
            for name in &summary.created {
                if opts.dry_run {
                    output::print_warning(&format!(
                        "cluster '{}' has no scanning alert (dry run)",
                        name
                    ));
                } else {
                    output::print_success(&format!(
                        "created scanning alert for cluster '{}'",
                        name
                    ));
                }
            }
            for failure in &summary.failed {
                output::print_error(&format!("{}: {}", failure.cluster, failure.error));
            }
            println!(
                "Reconciled {} clusters: {} created, {} skipped, {} failed",
                summary.created.len() + summary.skipped.len() + summary.failed.len(),
                summary.created.len(),
                summary.skipped.len(),
                summary.failed.len()
            );
        }
        _ => output::print_single(&summary, format)?,
    }

    if !summary.failed.is_empty() {
        anyhow::bail!(
            "{} cluster(s) could not be reconciled",
            summary.failed.len()
        );
    }

    Ok(())
}
