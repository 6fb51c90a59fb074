//! Wire shape of the live-alert feed.

use serde::Deserialize;

use crate::domain::alert::null_as_default;
use crate::domain::Alert;
use crate::port::FeedSnapshot;

/// Top-level feed document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveAlertsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    pub last_updated: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub routes: Vec<Alert>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accessibility: Vec<Alert>,
}

impl From<LiveAlertsResponse> for FeedSnapshot {
    fn from(response: LiveAlertsResponse) -> Self {
        let mut alerts = response.routes;
        alerts.extend(response.accessibility);
        Self {
            total: response.total,
            last_updated: response.last_updated,
            alerts,
        }
    }
}
