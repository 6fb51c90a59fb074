//! Publication policy filter and deterministic ordering.
//!
//! Both functions are pure and tolerate empty input.

use crate::domain::Alert;

/// Keep only alerts eligible for publication.
///
/// The policy is closed: only [`AlertType::Planned`](crate::domain::AlertType::Planned)
/// alerts pass; every other category is discarded.
#[must_use]
pub fn select(alerts: Vec<Alert>) -> Vec<Alert> {
    alerts.into_iter().filter(Alert::is_planned).collect()
}

/// Order alerts oldest first by their own update time.
///
/// The sort is stable, so ties keep feed order. Alerts without a parsable
/// timestamp sort before all timestamped ones.
#[must_use]
pub fn order(mut alerts: Vec<Alert>) -> Vec<Alert> {
    alerts.sort_by_key(Alert::updated_at);
    alerts
}
