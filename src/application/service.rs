//! One cadence tick: fetch, filter, reconcile, publish.

use std::sync::Arc;

use tracing::{debug, info, info_span, Instrument};

use super::filter::{order, select};
use super::pagination::KeyPager;
use super::publish::{PublishReport, Publisher};
use super::reconcile::ReconciliationEngine;
use crate::domain::SnapshotKey;
use crate::error::Result;
use crate::port::{AlertSource, Event, Notifier, RunFailureEvent, SnapshotCache};

/// Result of a tick.
#[derive(Debug)]
pub enum RunOutcome {
    /// Nothing new or changed; durable state untouched.
    Idle { key: SnapshotKey },
    Published(PublishReport),
}

/// The alert pipeline, wired to its collaborators.
pub struct AlertService {
    source: Arc<dyn AlertSource>,
    cache: Arc<dyn SnapshotCache>,
    pager: KeyPager,
    engine: ReconciliationEngine,
    publisher: Publisher,
    notifier: Arc<dyn Notifier>,
}

impl AlertService {
    #[must_use]
    pub fn new(
        source: Arc<dyn AlertSource>,
        cache: Arc<dyn SnapshotCache>,
        pager: KeyPager,
        publisher: Publisher,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            engine: ReconciliationEngine::new(Arc::clone(&cache)),
            source,
            cache,
            pager,
            publisher,
            notifier,
        }
    }

    /// Run one tick and report its outcome to the operator channel.
    ///
    /// # Errors
    /// Returns the tick's error after notifying; transient failures are left
    /// for the next tick to retry.
    pub async fn run_once(&self) -> Result<RunOutcome> {
        let span = info_span!("tick", run_id = %uuid::Uuid::new_v4());
        let result = self.tick().instrument(span).await;
        match &result {
            Ok(RunOutcome::Published(report)) => {
                self.notifier
                    .notify(Event::PublishCompleted(report.summary()));
            }
            Ok(RunOutcome::Idle { .. }) => {}
            Err(e) => self.notifier.notify(Event::RunFailed(RunFailureEvent::new(e))),
        }
        result
    }

    async fn tick(&self) -> Result<RunOutcome> {
        let feed = self.source.fetch().await?;
        let key = SnapshotKey::from_feed_timestamp(&feed.last_updated)?;
        let fetched = feed.alerts.len();
        let current = order(select(feed.alerts));
        info!(
            source = self.source.source_name(),
            reported = feed.total,
            fetched,
            eligible = current.len(),
            key = %key,
            "Fetched alerts"
        );

        let (existing, page) =
            tokio::try_join!(self.cache.get(&key), self.pager.latest_page())?;
        if existing.is_some() {
            debug!(key = %key, "Snapshot exists for this update time, checking content only");
        }

        let plan = self.engine.reconcile(current, &page).await?;
        if plan.is_noop() {
            info!(key = %key, "No new or changed alerts");
            return Ok(RunOutcome::Idle { key });
        }

        info!(
            key = %key,
            to_publish = plan.to_publish.len(),
            to_cache = plan.to_cache.len(),
            "Publishing new or changed alerts"
        );
        let report = self
            .publisher
            .publish(&plan.to_publish, &key, &plan.to_cache)
            .await?;
        Ok(RunOutcome::Published(report))
    }
}
