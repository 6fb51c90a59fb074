//! Post ledger port.

use async_trait::async_trait;

use crate::domain::{AlertId, PostId};
use crate::error::Result;

/// The post that first announced an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub alert_id: AlertId,
    pub post_id: PostId,
}

impl LedgerEntry {
    #[must_use]
    pub fn new(alert_id: AlertId, post_id: PostId) -> Self {
        Self { alert_id, post_id }
    }
}

/// Durable alert id to post id mapping.
///
/// One row per alert, written on first announcement and never replaced: the
/// recorded post is the root every later update quotes.
#[async_trait]
pub trait PostLedger: Send + Sync {
    /// Look up the announcing post for an alert.
    async fn find(&self, alert_id: &AlertId) -> Result<Option<LedgerEntry>>;

    /// Record a first announcement.
    ///
    /// Returns `false` without modifying anything if the alert already has
    /// an entry.
    async fn insert(&self, entry: &LedgerEntry) -> Result<bool>;
}
