//! Reconciliation of the current alert set against the last snapshot.
//!
//! An alert is published when its id was absent from the most recent
//! snapshot, or present with a different `headerText`. The full current set
//! always becomes the next snapshot so unchanged alerts stay known.
//!
//! Unreadable snapshots fail open: they are treated as empty, which may
//! re-announce alerts, and the post ledger turns those into quote-posts
//! rather than duplicate announcements.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{decode_alerts, Alert, AlertId, SnapshotKey};
use crate::error::Result;
use crate::port::{KeyPage, SnapshotCache};

/// What the previous state was compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Baseline {
    /// No snapshot existed at all.
    ColdStart,
    /// Compared against the snapshot stored under `key`.
    Snapshot { key: SnapshotKey, known: usize },
    /// The latest snapshot was missing or unparsable and treated as empty.
    Unreadable { key: SnapshotKey },
}

/// Output of one reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan {
    /// New or changed alerts, in publication order.
    pub to_publish: Vec<Alert>,
    /// The full current set, to persist as the next snapshot.
    pub to_cache: Vec<Alert>,
    pub baseline: Baseline,
}

impl ReconcilePlan {
    /// Nothing to publish; the caller must skip the snapshot write.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.to_publish.is_empty()
    }
}

/// Plan for an empty cache: publish every alert once.
#[must_use]
pub fn cold_start(current: Vec<Alert>) -> ReconcilePlan {
    let to_publish = canonical(&current).into_iter().cloned().collect();
    ReconcilePlan {
        to_publish,
        to_cache: current,
        baseline: Baseline::ColdStart,
    }
}

/// Alerts in `current` that are new or changed relative to `previous`.
///
/// `current` is expected in publication order; the result keeps that order.
#[must_use]
pub fn diff(current: &[Alert], previous: &[Alert]) -> Vec<Alert> {
    let known: HashMap<&AlertId, &Alert> = canonical(previous)
        .into_iter()
        .map(|alert| (&alert.id, alert))
        .collect();

    canonical(current)
        .into_iter()
        .filter(|alert| match known.get(&alert.id) {
            None => true,
            Some(prev) => prev.header_text != alert.header_text,
        })
        .cloned()
        .collect()
}

/// One alert per id, in input order.
///
/// When an id repeats, the occurrence with the latest per-alert timestamp
/// wins; ties go to the first occurrence.
fn canonical(alerts: &[Alert]) -> Vec<&Alert> {
    let mut winners: HashMap<&AlertId, usize> = HashMap::with_capacity(alerts.len());
    for (idx, alert) in alerts.iter().enumerate() {
        match winners.entry(&alert.id) {
            Entry::Vacant(slot) => {
                slot.insert(idx);
            }
            Entry::Occupied(mut slot) => {
                if alert.updated_at() > alerts[*slot.get()].updated_at() {
                    slot.insert(idx);
                }
            }
        }
    }

    alerts
        .iter()
        .enumerate()
        .filter(|(idx, alert)| winners.get(&alert.id) == Some(idx))
        .map(|(_, alert)| alert)
        .collect()
}

/// Compares the current alert set with the most recent cached snapshot.
pub struct ReconciliationEngine {
    cache: Arc<dyn SnapshotCache>,
}

impl ReconciliationEngine {
    /// Create an engine that reads previous snapshots from `cache`.
    #[must_use]
    pub fn new(cache: Arc<dyn SnapshotCache>) -> Self {
        Self { cache }
    }

    /// Reconcile `current` (filtered and ordered) against the latest key in `keys`.
    ///
    /// # Errors
    /// Returns an error only if reading the snapshot fails at the store level.
    pub async fn reconcile(&self, current: Vec<Alert>, keys: &KeyPage) -> Result<ReconcilePlan> {
        let Some(latest) = keys.latest() else {
            info!(alerts = current.len(), "No cached snapshots, cold start");
            return Ok(cold_start(current));
        };

        let (previous, baseline) = match self.load(latest).await? {
            Some(previous) => {
                let known = previous.len();
                (
                    previous,
                    Baseline::Snapshot {
                        key: latest.clone(),
                        known,
                    },
                )
            }
            None => (
                Vec::new(),
                Baseline::Unreadable {
                    key: latest.clone(),
                },
            ),
        };

        let to_publish = diff(&current, &previous);
        debug!(
            key = %latest,
            previous = previous.len(),
            current = current.len(),
            to_publish = to_publish.len(),
            "Reconciled against cached snapshot"
        );

        Ok(ReconcilePlan {
            to_publish,
            to_cache: current,
            baseline,
        })
    }

    async fn load(&self, key: &SnapshotKey) -> Result<Option<Vec<Alert>>> {
        let Some(raw) = self.cache.get(key).await? else {
            warn!(key = %key, "Listed snapshot has no value, treating as empty");
            return Ok(None);
        };
        match decode_alerts(&raw) {
            Ok(alerts) => Ok(Some(alerts)),
            Err(e) => {
                warn!(key = %key, error = %e, "Cached snapshot is unparsable, treating as empty");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::MemorySnapshotCache;

    fn alert(id: &str, header: &str) -> Alert {
        Alert::new(id, header)
    }

    fn ids(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn diff_detects_new_ids() {
        let previous = vec![alert("1", "a")];
        let current = vec![alert("1", "a"), alert("2", "b")];
        assert_eq!(diff(&current, &previous), vec![alert("2", "b")]);
    }

    #[test]
    fn diff_detects_changed_header() {
        let previous = vec![alert("1", "a")];
        let current = vec![alert("1", "a-updated")];
        assert_eq!(diff(&current, &previous), vec![alert("1", "a-updated")]);
    }

    #[test]
    fn diff_of_identical_sets_is_empty() {
        let set = vec![alert("1", "a"), alert("2", "b")];
        assert!(diff(&set, &set).is_empty());
    }

    #[test]
    fn diff_ignores_removed_alerts() {
        let previous = vec![alert("1", "a"), alert("2", "b")];
        let current = vec![alert("2", "b")];
        assert!(diff(&current, &previous).is_empty());
    }

    #[test]
    fn duplicate_ids_keep_latest_occurrence() {
        let current = vec![
            alert("1", "old").with_last_updated("2024-06-19T08:00:00Z"),
            alert("2", "other").with_last_updated("2024-06-19T09:00:00Z"),
            alert("1", "new").with_last_updated("2024-06-19T10:00:00Z"),
        ];
        let published = diff(&current, &[]);
        assert_eq!(ids(&published), vec!["2", "1"]);
        assert_eq!(published[1].header_text, "new");
    }

    #[test]
    fn duplicate_ids_with_equal_timestamps_keep_first() {
        let current = vec![alert("1", "first"), alert("1", "second")];
        let published = diff(&current, &[]);
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].header_text, "first");
    }

    #[test]
    fn cold_start_publishes_and_caches_everything() {
        let current = vec![alert("1", "a"), alert("2", "b")];
        let plan = cold_start(current.clone());
        assert_eq!(plan.to_publish, current);
        assert_eq!(plan.to_cache, current);
        assert_eq!(plan.baseline, Baseline::ColdStart);
    }

    #[tokio::test]
    async fn empty_listing_is_cold_start() {
        let engine = ReconciliationEngine::new(Arc::new(MemorySnapshotCache::default()));
        let current = vec![alert("1", "a")];
        let plan = engine
            .reconcile(current.clone(), &KeyPage::default())
            .await
            .unwrap();
        assert_eq!(plan.to_publish, current);
        assert_eq!(plan.to_cache, current);
    }

    #[tokio::test]
    async fn compares_against_latest_key() {
        let cache = Arc::new(MemorySnapshotCache::default());
        let old = SnapshotKey::from_millis(1);
        let new = SnapshotKey::from_millis(2);
        cache
            .put(&old, r#"[{"id":"1","headerText":"stale"}]"#.into())
            .await
            .unwrap();
        cache
            .put(&new, r#"[{"id":"1","headerText":"a"}]"#.into())
            .await
            .unwrap();
        let page = cache.list_keys(None).await.unwrap();

        let engine = ReconciliationEngine::new(cache);
        let plan = engine
            .reconcile(vec![alert("1", "a")], &page)
            .await
            .unwrap();
        assert!(plan.is_noop());
        assert_eq!(
            plan.baseline,
            Baseline::Snapshot {
                key: new,
                known: 1
            }
        );
    }

    #[tokio::test]
    async fn unparsable_snapshot_fails_open() {
        let cache = Arc::new(MemorySnapshotCache::default());
        let key = SnapshotKey::from_millis(5);
        cache.put(&key, "{not json".into()).await.unwrap();
        let page = cache.list_keys(None).await.unwrap();

        let engine = ReconciliationEngine::new(cache);
        let current = vec![alert("1", "a"), alert("2", "b")];
        let plan = engine.reconcile(current.clone(), &page).await.unwrap();
        assert_eq!(plan.to_publish, current);
        assert_eq!(plan.baseline, Baseline::Unreadable { key });
    }

    #[tokio::test]
    async fn to_cache_is_full_current_set() {
        let cache = Arc::new(MemorySnapshotCache::default());
        let key = SnapshotKey::from_millis(5);
        cache
            .put(&key, r#"[{"id":"1","headerText":"a"}]"#.into())
            .await
            .unwrap();
        let page = cache.list_keys(None).await.unwrap();

        let engine = ReconciliationEngine::new(cache);
        let current = vec![alert("1", "a"), alert("2", "b")];
        let plan = engine.reconcile(current.clone(), &page).await.unwrap();
        assert_eq!(ids(&plan.to_publish), vec!["2"]);
        assert_eq!(plan.to_cache, current);
    }
}
