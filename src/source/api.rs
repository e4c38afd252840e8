//! Mock lot listing API.

use std::time::Duration;

use crate::auction::Lot;
use crate::source::error::SourceError;

/// Resource path of the lot listing.
pub const LOTS_RESOURCE: &str = "/lots";

const LOTS_FIXTURE: &str = include_str!("../../assets/lots.json");

/// Resolves `fetch` calls after a fixed latency.
#[derive(Debug, Clone)]
pub struct LotApi {
    latency: Duration,
}

impl LotApi {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Fetches `resource`. Unknown paths fail immediately, without waiting
    /// out the latency.
    pub async fn fetch(&self, resource: &str) -> Result<Vec<Lot>, SourceError> {
        if resource != LOTS_RESOURCE {
            return Err(SourceError::UnknownResource {
                resource: resource.to_string(),
            });
        }

        tokio::time::sleep(self.latency).await;
        let lots: Vec<Lot> =
            serde_json::from_str(LOTS_FIXTURE).map_err(|source| SourceError::Fixture { source })?;
        tracing::debug!(resource, count = lots.len(), "lots fetched");
        Ok(lots)
    }
}
