//! Notifier port for operator notifications.
//!
//! This module defines the trait for reporting run outcomes and failures to
//! an operator channel. Notifications are fire-and-forget and fully
//! decoupled from the reconciliation logic.

use chrono::{DateTime, Utc};

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// A tick aborted or finished with a bookkeeping failure.
    RunFailed(RunFailureEvent),
    /// A tick published at least one alert.
    PublishCompleted(PublishSummaryEvent),
    /// The posting credential could not be refreshed.
    TokenRefreshFailed {
        /// The reason refresh failed.
        reason: String,
    },
    /// The posting credential was refreshed.
    TokenRefreshed,
}

impl Event {
    /// Short human-readable title.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::RunFailed(e) if e.hard => "bookkeeping failed after publishing".to_string(),
            Self::RunFailed(_) => "alert run failed".to_string(),
            Self::PublishCompleted(e) => format!("published {} alert post(s)", e.published),
            Self::TokenRefreshFailed { .. } => "could not refresh access token".to_string(),
            Self::TokenRefreshed => "access token refreshed".to_string(),
        }
    }

    /// Free-form details for the notification body.
    #[must_use]
    pub fn context(&self) -> String {
        match self {
            Self::RunFailed(e) => e.error.clone(),
            Self::PublishCompleted(e) => format!(
                "snapshot {}: {} published, {} skipped, {} failed, {} not attempted",
                e.snapshot_key, e.published, e.skipped, e.failed, e.not_attempted
            ),
            Self::TokenRefreshFailed { reason } => reason.clone(),
            Self::TokenRefreshed => String::new(),
        }
    }

    /// True for events that report something going wrong.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        match self {
            Self::RunFailed(_) | Self::TokenRefreshFailed { .. } => true,
            Self::PublishCompleted(e) => e.failed > 0,
            Self::TokenRefreshed => false,
        }
    }
}

/// Run failure event.
#[derive(Debug, Clone)]
pub struct RunFailureEvent {
    /// Error message.
    pub error: String,
    /// Whether the failure threatens future-run correctness.
    pub hard: bool,
    /// When the failure was observed.
    pub at: DateTime<Utc>,
}

impl RunFailureEvent {
    #[must_use]
    pub fn new(error: &crate::error::Error) -> Self {
        Self {
            error: error.to_string(),
            hard: error.is_hard(),
            at: Utc::now(),
        }
    }
}

/// Publication summary event.
#[derive(Debug, Clone)]
pub struct PublishSummaryEvent {
    /// Key the snapshot was written under.
    pub snapshot_key: String,
    /// Number of posts made live.
    pub published: usize,
    /// Number of alerts skipped as invalid.
    pub skipped: usize,
    /// Number of isolated per-alert failures.
    pub failed: usize,
    /// Number of alerts left unprocessed by shutdown or a systemic failure.
    pub not_attempted: usize,
}

/// Trait for notification handlers.
///
/// Implement this trait to receive events from the system.
/// Notifications are fire-and-forget (async but not awaited).
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The `notify` method should not block or perform slow I/O synchronously
/// - Consider spawning async tasks for slow operations
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        self.notify_all(event);
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::{error, info, warn};
        match &event {
            Event::RunFailed(e) if e.hard => {
                error!(error = %e.error, "Hard failure, future runs may re-announce alerts");
            }
            Event::RunFailed(e) => {
                warn!(error = %e.error, "Run failed, next tick retries");
            }
            Event::PublishCompleted(e) => {
                info!(
                    key = %e.snapshot_key,
                    published = e.published,
                    skipped = e.skipped,
                    failed = e.failed,
                    not_attempted = e.not_attempted,
                    "Publish completed"
                );
            }
            Event::TokenRefreshFailed { reason } => {
                error!(reason = %reason, "Token refresh failed");
            }
            Event::TokenRefreshed => {
                info!("Token refreshed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingNotifier {
        count: Arc<AtomicUsize>,
    }

    impl Notifier for CountingNotifier {
        fn notify(&self, _event: Event) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn registry_notifies_every_notifier() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(CountingNotifier {
            count: count.clone(),
        }));
        registry.register(Box::new(CountingNotifier {
            count: count.clone(),
        }));

        registry.notify_all(Event::TokenRefreshed);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn registry_len_and_is_empty() {
        let mut registry = NotifierRegistry::new();
        assert!(registry.is_empty());
        registry.register(Box::new(NullNotifier));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn hard_run_failure_title() {
        let err = crate::error::Error::Persistence {
            published: 1,
            reason: "ledger insert failed".into(),
        };
        let event = Event::RunFailed(RunFailureEvent::new(&err));
        assert_eq!(event.title(), "bookkeeping failed after publishing");
        assert!(event.context().contains("ledger insert failed"));
        assert!(event.is_failure());
    }

    #[test]
    fn clean_summary_is_not_a_failure() {
        let event = Event::PublishCompleted(PublishSummaryEvent {
            snapshot_key: "00000000000000000001".into(),
            published: 2,
            skipped: 1,
            failed: 0,
            not_attempted: 0,
        });
        assert!(!event.is_failure());
        assert_eq!(event.title(), "published 2 alert post(s)");
        assert!(event.context().contains("2 published, 1 skipped"));
    }

    #[test]
    fn log_notifier_handles_all_events() {
        let notifier = LogNotifier;
        notifier.notify(Event::TokenRefreshed);
        notifier.notify(Event::TokenRefreshFailed {
            reason: "expired".into(),
        });
    }
}
