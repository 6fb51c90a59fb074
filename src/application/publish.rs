//! Sequential, paced publication of reconciled alerts.
//!
//! The snapshot is written before the first post so a crash mid-batch does
//! not make the next run re-detect the processed alerts. The post ledger is
//! the second guard: an alert with a recorded post is republished as a
//! quote of that post, never as a fresh announcement, and its ledger row is
//! left untouched.
//!
//! Failures are isolated per alert. Only a systemic posting failure (the
//! credential itself refused) aborts the rest of the batch. Snapshot and
//! ledger write failures surface as [`Error::Persistence`] once the loop
//! has finished.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::domain::{Alert, AlertId, AlertSnapshot, ContainerId, PostDraft, PostId, SnapshotKey};
use crate::error::{Error, PostingError, PostingStage, Result};
use crate::port::{
    ContainerOutcome, LedgerEntry, PostLedger, PostingApi, PublishOutcome, PublishSummaryEvent,
    SnapshotCache,
};

/// Default pause between successful posts.
pub const DEFAULT_POST_INTERVAL: Duration = Duration::from_secs(60);

/// Publisher settings.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Pause after each successful post that is followed by another alert.
    pub post_interval: Duration,
    /// Prefix posts with the route-type tag line.
    pub include_route_tag: bool,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            post_interval: DEFAULT_POST_INTERVAL,
            include_route_tag: true,
        }
    }
}

/// Why an alert was not posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyId,
    EmptyHeadline,
}

/// What happened to one alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    Published {
        post_id: PostId,
        /// Root post this one quoted, for updates to announced alerts.
        quoted: Option<PostId>,
    },
    Skipped(SkipReason),
    Failed(String),
    /// Left unprocessed by shutdown or a systemic failure.
    NotAttempted,
}

/// What happened to one alert of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertResult {
    /// Alert the outcome belongs to.
    pub alert_id: AlertId,
    /// Published, skipped, failed or not attempted.
    pub outcome: AlertOutcome,
}

/// Summary of one publish batch.
#[derive(Debug, Clone)]
pub struct PublishReport {
    /// Key the batch's snapshot was written under.
    pub snapshot_key: SnapshotKey,
    /// One entry per alert handed to the publisher, in publish order.
    pub results: Vec<AlertResult>,
    /// Set when a systemic failure stopped the batch.
    pub aborted: Option<String>,
    /// Set when shutdown stopped the batch.
    pub cancelled: bool,
}

impl PublishReport {
    fn new(snapshot_key: SnapshotKey) -> Self {
        Self {
            snapshot_key,
            results: Vec::new(),
            aborted: None,
            cancelled: false,
        }
    }

    fn count(&self, pred: impl Fn(&AlertOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    #[must_use]
    pub fn published(&self) -> usize {
        self.count(|o| matches!(o, AlertOutcome::Published { .. }))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, AlertOutcome::Skipped(_)))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, AlertOutcome::Failed(_)))
    }

    #[must_use]
    pub fn not_attempted(&self) -> usize {
        self.count(|o| matches!(o, AlertOutcome::NotAttempted))
    }

    #[must_use]
    pub fn outcome_of(&self, alert_id: &AlertId) -> Option<&AlertOutcome> {
        self.results
            .iter()
            .find(|r| &r.alert_id == alert_id)
            .map(|r| &r.outcome)
    }

    #[must_use]
    pub fn summary(&self) -> PublishSummaryEvent {
        PublishSummaryEvent {
            snapshot_key: self.snapshot_key.to_string(),
            published: self.published(),
            skipped: self.skipped(),
            failed: self.failed(),
            not_attempted: self.not_attempted(),
        }
    }

    fn record(&mut self, alert: &Alert, outcome: AlertOutcome) {
        self.results.push(AlertResult {
            alert_id: alert.id.clone(),
            outcome,
        });
    }

    fn give_up_on(&mut self, rest: &[Alert]) {
        for alert in rest {
            self.record(alert, AlertOutcome::NotAttempted);
        }
    }
}

/// Drives the two-step posting API over a batch of alerts.
pub struct Publisher {
    posting: Arc<dyn PostingApi>,
    ledger: Arc<dyn PostLedger>,
    cache: Arc<dyn SnapshotCache>,
    config: PublisherConfig,
    shutdown: Option<watch::Receiver<bool>>,
}

impl Publisher {
    /// Create a publisher over the posting API and both bookkeeping stores.
    #[must_use]
    pub fn new(
        posting: Arc<dyn PostingApi>,
        ledger: Arc<dyn PostLedger>,
        cache: Arc<dyn SnapshotCache>,
        config: PublisherConfig,
    ) -> Self {
        Self {
            posting,
            ledger,
            cache,
            config,
            shutdown: None,
        }
    }

    /// Stop before the next alert once `shutdown` turns true.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Persist `to_cache` under `snapshot_key`, then publish `alerts` in order.
    ///
    /// # Errors
    /// Returns [`Error::Persistence`] after the loop if the snapshot or a
    /// ledger row could not be written. Per-alert posting failures are
    /// reported in the [`PublishReport`], not as errors.
    pub async fn publish(
        &self,
        alerts: &[Alert],
        snapshot_key: &SnapshotKey,
        to_cache: &[Alert],
    ) -> Result<PublishReport> {
        let mut report = PublishReport::new(snapshot_key.clone());
        let mut bookkeeping: Vec<String> = Vec::new();

        if let Err(e) = self.write_snapshot(snapshot_key, to_cache).await {
            error!(key = %snapshot_key, error = %e, "Failed to write snapshot, relying on ledger");
            bookkeeping.push(format!("snapshot {snapshot_key}: {e}"));
        }

        for (idx, alert) in alerts.iter().enumerate() {
            if self.shutdown_requested() {
                info!(remaining = alerts.len() - idx, "Shutdown requested, stopping publish loop");
                report.cancelled = true;
                report.give_up_on(&alerts[idx..]);
                break;
            }

            let Some(mut draft) = self.validate(alert, &mut report) else {
                continue;
            };

            let root = match self.ledger.find(&alert.id).await {
                Ok(entry) => entry.map(|e| e.post_id),
                Err(e) => {
                    warn!(alert_id = %alert.id, error = %e, "Ledger lookup failed, skipping alert");
                    report.record(alert, AlertOutcome::Failed(format!("ledger lookup: {e}")));
                    continue;
                }
            };
            if let Some(root) = &root {
                draft = draft.quoting(root.clone());
            }

            let post_id = match self.post(&draft).await {
                Ok(post_id) => post_id,
                Err(e) => {
                    warn!(alert_id = %alert.id, error = %e, "Failed to publish alert");
                    let systemic = matches!(&e, Error::Posting(p) if p.is_systemic());
                    report.record(alert, AlertOutcome::Failed(e.to_string()));
                    if systemic {
                        error!(error = %e, "Posting credential refused, aborting batch");
                        report.aborted = Some(e.to_string());
                        report.give_up_on(&alerts[idx + 1..]);
                        break;
                    }
                    continue;
                }
            };

            info!(
                alert_id = %alert.id,
                post_id = %post_id,
                quoted = root.as_ref().map(PostId::as_str),
                "Published alert"
            );

            if root.is_none() {
                let entry = LedgerEntry::new(alert.id.clone(), post_id.clone());
                match self.ledger.insert(&entry).await {
                    Ok(true) => {}
                    Ok(false) => debug!(alert_id = %alert.id, "Ledger already had an entry"),
                    Err(e) => {
                        error!(alert_id = %alert.id, error = %e, "Failed to record post in ledger");
                        bookkeeping.push(format!("ledger {}: {e}", alert.id));
                    }
                }
            }

            report.record(
                alert,
                AlertOutcome::Published {
                    post_id,
                    quoted: root,
                },
            );

            if idx + 1 < alerts.len() && !self.pace().await {
                info!("Shutdown requested while pacing, stopping publish loop");
                report.cancelled = true;
                report.give_up_on(&alerts[idx + 1..]);
                break;
            }
        }

        info!(
            key = %snapshot_key,
            published = report.published(),
            skipped = report.skipped(),
            failed = report.failed(),
            not_attempted = report.not_attempted(),
            "Publish batch finished"
        );

        if bookkeeping.is_empty() {
            Ok(report)
        } else {
            Err(Error::Persistence {
                published: report.published(),
                reason: bookkeeping.join("; "),
            })
        }
    }

    async fn write_snapshot(&self, key: &SnapshotKey, alerts: &[Alert]) -> Result<()> {
        let value = AlertSnapshot::new(key.clone(), alerts.to_vec()).encode()?;
        self.cache.put(key, value).await?;
        debug!(key = %key, alerts = alerts.len(), "Snapshot written");
        Ok(())
    }

    fn validate(&self, alert: &Alert, report: &mut PublishReport) -> Option<PostDraft> {
        if alert.id.is_empty() {
            warn!("Skipping alert with empty id");
            report.record(alert, AlertOutcome::Skipped(SkipReason::EmptyId));
            return None;
        }
        let draft = PostDraft::for_alert(alert, self.config.include_route_tag);
        if draft.is_none() {
            warn!(alert_id = %alert.id, "Skipping alert with empty headerText");
            report.record(alert, AlertOutcome::Skipped(SkipReason::EmptyHeadline));
        }
        draft
    }

    async fn post(&self, draft: &PostDraft) -> Result<PostId> {
        let container: ContainerId = match self.posting.create_container(draft).await? {
            ContainerOutcome::Created(id) => id,
            ContainerOutcome::Rejected(failure) => {
                return Err(PostingError::Rejected {
                    stage: PostingStage::CreateContainer,
                    failure,
                }
                .into())
            }
        };

        match self.posting.publish_container(&container).await? {
            PublishOutcome::Published(post_id) => Ok(post_id),
            PublishOutcome::Rejected(failure) => Err(PostingError::Rejected {
                stage: PostingStage::PublishContainer,
                failure,
            }
            .into()),
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Wait out the post interval. Returns `false` if shutdown interrupted it.
    async fn pace(&self) -> bool {
        let interval = self.config.post_interval;
        let Some(shutdown) = &self.shutdown else {
            sleep(interval).await;
            return true;
        };
        let mut shutdown = shutdown.clone();
        tokio::select! {
            () = sleep(interval) => true,
            true = stop_signalled(&mut shutdown) => false,
        }
    }
}

/// Resolves `true` once shutdown is signalled, `false` if the sender is gone.
async fn stop_signalled(shutdown: &mut watch::Receiver<bool>) -> bool {
    loop {
        if *shutdown.borrow_and_update() {
            return true;
        }
        if shutdown.changed().await.is_err() {
            return false;
        }
    }
}
