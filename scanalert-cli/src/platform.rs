///! Platform API surface consumed by the reconciler

use async_trait::async_trait;
use scanalert_common::{
    AlertList, AlertPayload, AlertRecord, ApiError, Cluster, MetadataQuery, MetadataResult, Paging,
    CLUSTER_NAME_METRIC,
};

use crate::api::ApiClient;

pub const METADATA_PATH: &str = "/api/data/entity/metadata";
pub const ALERTS_PATH: &str = "/api/scanning/v1/alerts";

// Fixed metadata paging window. Not re-paginated: clusters beyond it are
// silently omitted (known scaling limitation, surfaced via a warning).
const PAGE_FROM: u32 = 0;
const PAGE_TO: u32 = 9999;

#[async_trait]
pub trait PlatformApi {
    async fn fetch_clusters(&self) -> Result<Vec<Cluster>, ApiError>;
    async fn fetch_alerts(&self) -> Result<Vec<AlertRecord>, ApiError>;
    async fn create_alert(&self, payload: &AlertPayload) -> Result<(), ApiError>;
}

#[async_trait]
impl PlatformApi for ApiClient {
    async fn fetch_clusters(&self) -> Result<Vec<Cluster>, ApiError> {
        let query = MetadataQuery {
            paging: Paging {
                from: PAGE_FROM,
                to: PAGE_TO,
            },
            metrics: vec![CLUSTER_NAME_METRIC.to_string()],
        };

        let result: MetadataResult = self.post(METADATA_PATH, &query).await?;

        if let Some(paging) = &result.paging {
            if paging.total as usize > result.data.len() {
                log::warn!(
                    "metadata window {}..{} returned {} of {} clusters; the rest are not reconciled",
                    PAGE_FROM,
                    PAGE_TO,
                    result.data.len(),
                    paging.total
                );
            }
        }

        Ok(result.data)
    }

    async fn fetch_alerts(&self) -> Result<Vec<AlertRecord>, ApiError> {
        let list: AlertList = self.get(ALERTS_PATH).await?;
        Ok(list.alerts)
    }

    async fn create_alert(&self, payload: &AlertPayload) -> Result<(), ApiError> {
        self.post_empty(ALERTS_PATH, payload).await
    }
}
