//! Scheduler cadence under paused time.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alertline::adapter::outbound::memory::{MemoryPostLedger, MemorySnapshotCache};
use alertline::application::{AlertService, KeyPager, Publisher, PublisherConfig};
use alertline::error::Result;
use alertline::infrastructure::bootstrap::Runtime;
use alertline::infrastructure::config::schedule::ScheduleConfig;
use alertline::infrastructure::scheduler;
use alertline::port::{Event, SnapshotCache, TokenRefresher};
use alertline::testkit::fake::{RecordingNotifier, ScriptedPoster, ScriptedSource};
use alertline::testkit::fixture::{feed, planned};
use async_trait::async_trait;
use tokio::sync::watch;

#[derive(Default)]
struct CountingRefresher {
    calls: AtomicUsize,
}

#[async_trait]
impl TokenRefresher for CountingRefresher {
    async fn refresh(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn runtime(
    source: Arc<ScriptedSource>,
    refresher: Option<Arc<dyn TokenRefresher>>,
    notifier: RecordingNotifier,
) -> Runtime {
    let cache: Arc<dyn SnapshotCache> = Arc::new(MemorySnapshotCache::default());
    let publisher = Publisher::new(
        Arc::new(ScriptedPoster::new()),
        Arc::new(MemoryPostLedger::default()),
        Arc::clone(&cache),
        PublisherConfig {
            post_interval: Duration::ZERO,
            include_route_tag: false,
        },
    );
    let notifier = Arc::new(notifier);
    let service = AlertService::new(
        source,
        Arc::clone(&cache),
        KeyPager::new(cache),
        publisher,
        notifier.clone(),
    );
    Runtime {
        service,
        refresher,
        notifier,
    }
}

fn schedule(poll: u64, refresh: u64, refresh_on_start: bool) -> ScheduleConfig {
    ScheduleConfig {
        poll_interval_secs: poll,
        post_interval_secs: 0,
        token_refresh_interval_secs: refresh,
        refresh_token_on_start: refresh_on_start,
    }
}

#[tokio::test(start_paused = true)]
async fn ticks_on_the_poll_interval_until_shutdown() {
    let source = Arc::new(ScriptedSource::new(vec![feed(vec![planned(
        "1",
        "Line 1: early closure",
        1,
    )])]));
    let runtime = runtime(source.clone(), None, RecordingNotifier::new());
    let (tx, rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        scheduler::run(runtime, &schedule(60, 3600, false), rx).await;
    });

    // Ticks at 0s, 60s and 120s.
    tokio::time::sleep(Duration::from_secs(150)).await;
    tx.send(true).unwrap();
    handle.await.unwrap();

    assert_eq!(source.fetches(), 3);
}

#[tokio::test(start_paused = true)]
async fn dropped_sender_stops_the_scheduler() {
    let source = Arc::new(ScriptedSource::new(vec![feed(vec![])]));
    let runtime = runtime(source.clone(), None, RecordingNotifier::new());
    let (tx, rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        scheduler::run(runtime, &schedule(60, 3600, false), rx).await;
    });
    tokio::time::sleep(Duration::from_secs(30)).await;
    drop(tx);

    handle.await.unwrap();
    assert_eq!(source.fetches(), 1);
}

#[tokio::test(start_paused = true)]
async fn token_refresh_runs_on_its_own_interval() {
    let source = Arc::new(ScriptedSource::new(vec![feed(vec![])]));
    let refresher = Arc::new(CountingRefresher::default());
    let notifier = RecordingNotifier::new();
    let runtime = runtime(
        source,
        Some(refresher.clone() as Arc<dyn TokenRefresher>),
        notifier.clone(),
    );
    let (tx, rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        scheduler::run(runtime, &schedule(60, 100, true), rx).await;
    });

    // Refreshes at 0s, 100s and 200s.
    tokio::time::sleep(Duration::from_secs(250)).await;
    tx.send(true).unwrap();
    handle.await.unwrap();

    assert_eq!(refresher.calls.load(Ordering::SeqCst), 3);
    let refreshed = notifier
        .events()
        .into_iter()
        .filter(|e| matches!(e, Event::TokenRefreshed))
        .count();
    assert_eq!(refreshed, 3);
}

#[tokio::test(start_paused = true)]
async fn first_refresh_waits_a_full_interval_by_default() {
    let source = Arc::new(ScriptedSource::new(vec![feed(vec![])]));
    let refresher = Arc::new(CountingRefresher::default());
    let runtime = runtime(
        source,
        Some(refresher.clone() as Arc<dyn TokenRefresher>),
        RecordingNotifier::new(),
    );
    let (tx, rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        scheduler::run(runtime, &schedule(60, 100, false), rx).await;
    });

    tokio::time::sleep(Duration::from_secs(50)).await;
    assert_eq!(refresher.calls.load(Ordering::SeqCst), 0);
    tokio::time::sleep(Duration::from_secs(100)).await;
    tx.send(true).unwrap();
    handle.await.unwrap();

    assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
}
