//! Fixed-cadence driver for alert ticks and token refreshes.
//!
//! Ticks run inline in the select loop, so a tick still publishing when the
//! next one falls due delays it instead of overlapping; missed ticks are
//! skipped rather than burst.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

use super::bootstrap::Runtime;
use super::config::schedule::ScheduleConfig;
use crate::error::Result;
use crate::port::{Event, Notifier, TokenRefresher};

/// Refresh the access token and report the outcome to the operator.
///
/// # Errors
/// Returns the refresh error after notifying.
pub async fn refresh_token(
    refresher: &dyn TokenRefresher,
    notifier: &dyn Notifier,
) -> Result<()> {
    match refresher.refresh().await {
        Ok(()) => {
            notifier.notify(Event::TokenRefreshed);
            Ok(())
        }
        Err(e) => {
            notifier.notify(Event::TokenRefreshFailed {
                reason: e.to_string(),
            });
            Err(e)
        }
    }
}

/// Run until `shutdown` turns true or its sender is dropped.
pub async fn run(runtime: Runtime, schedule: &ScheduleConfig, mut shutdown: watch::Receiver<bool>) {
    let mut poll = interval(schedule.poll_interval());
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let refresh_every = schedule.token_refresh_interval();
    let first_refresh = if schedule.refresh_token_on_start {
        Instant::now()
    } else {
        Instant::now() + refresh_every
    };
    let mut refresh = interval_at(first_refresh, refresh_every);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let refresher: Option<Arc<dyn TokenRefresher>> = runtime.refresher.clone();
    info!(
        poll_interval_secs = schedule.poll_interval_secs,
        token_refresh = refresher.is_some(),
        "Scheduler started"
    );

    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = refresh.tick(), if refresher.is_some() => {
                if let Some(refresher) = &refresher {
                    if let Err(e) = refresh_token(refresher.as_ref(), runtime.notifier.as_ref()).await {
                        warn!(error = %e, "Scheduled token refresh failed");
                    }
                }
            }
            _ = poll.tick() => {
                // Failures are logged and notified inside; the next tick retries.
                let _ = runtime.service.run_once().await;
            }
        }
    }

    info!("Scheduler stopped");
}
