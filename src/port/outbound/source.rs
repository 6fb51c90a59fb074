//! Alert feed port.

use async_trait::async_trait;

use crate::domain::Alert;
use crate::error::Result;

/// One fetch of the upstream feed, route and accessibility alerts combined.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    /// Count the feed reports; informational only.
    pub total: u64,
    /// Feed-level update timestamp, the source of the snapshot key.
    pub last_updated: String,
    /// Route alerts followed by accessibility alerts, in feed order.
    pub alerts: Vec<Alert>,
}

/// Source of the current alert set.
#[async_trait]
pub trait AlertSource: Send + Sync {
    /// Fetch and normalize the current alert set.
    async fn fetch(&self) -> Result<FeedSnapshot>;

    /// Name for logging.
    fn source_name(&self) -> &'static str;
}
