//! Builders for alerts and feed documents used across tests.

use crate::domain::{Alert, AlertType, RouteType, SnapshotKey};
use crate::port::FeedSnapshot;

/// Feed-level timestamp used by [`feed`].
pub const FEED_UPDATED: &str = "2024-06-19T15:40:10.94Z";

/// A planned alert with a per-alert update time `minute` minutes past 15:00.
pub fn planned(id: &str, header: &str, minute: u32) -> Alert {
    Alert::new(id, header).with_last_updated(format!("2024-06-19T15:{minute:02}:00Z"))
}

/// A planned subway alert.
pub fn subway(id: &str, header: &str) -> Alert {
    Alert::new(id, header).with_route_type(RouteType::Subway)
}

/// A site-wide notice, never eligible for publication.
pub fn site_wide(id: &str, header: &str) -> Alert {
    Alert::new(id, header).with_type(AlertType::SiteWide)
}

/// `n` planned alerts with ids `a0..a{n-1}` in chronological order.
pub fn planned_batch(n: usize) -> Vec<Alert> {
    (0..n)
        .map(|i| {
            let minute = u32::try_from(i % 60).unwrap_or(0);
            planned(&format!("a{i}"), &format!("alert {i}"), minute)
        })
        .collect()
}

/// A feed document at [`FEED_UPDATED`] carrying `alerts`.
pub fn feed(alerts: Vec<Alert>) -> FeedSnapshot {
    feed_at(FEED_UPDATED, alerts)
}

/// A feed document at an arbitrary feed-level timestamp.
pub fn feed_at(last_updated: &str, alerts: Vec<Alert>) -> FeedSnapshot {
    FeedSnapshot {
        total: alerts.len() as u64,
        last_updated: last_updated.to_string(),
        alerts,
    }
}

/// The snapshot key [`FEED_UPDATED`] maps to.
pub fn feed_key() -> SnapshotKey {
    SnapshotKey::from_millis(1_718_811_610_940)
}

/// Raw JSON of the upstream feed, as served by the live endpoint.
pub fn live_alerts_json(last_updated: &str, alerts: &[Alert]) -> String {
    serde_json::json!({
        "total": alerts.len(),
        "lastUpdated": last_updated,
        "routes": alerts,
        "accessibility": [],
    })
    .to_string()
}
