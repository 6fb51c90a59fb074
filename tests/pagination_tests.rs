//! Key listing across page boundaries, as seen by the reconciliation engine.

use std::sync::Arc;

use alertline::adapter::outbound::memory::MemoryCursorStore;
use alertline::application::{Baseline, KeyPager, ReconciliationEngine};
use alertline::domain::{AlertSnapshot, SnapshotKey};
use alertline::port::CursorStore;
use alertline::testkit::fake::RecordingCache;
use alertline::testkit::fixture::planned;

const PAGE: usize = 1000;

async fn seeded(count: u64) -> Arc<RecordingCache> {
    let cache = Arc::new(RecordingCache::new(PAGE));
    for millis in 1..=count {
        cache.seed(&SnapshotKey::from_millis(millis), "[]".into()).await;
    }
    cache
}

#[tokio::test]
async fn full_first_page_triggers_follow_up_listing() {
    let cache = seeded(1000).await;
    let pager = KeyPager::new(cache.clone());

    let page = pager.latest_page().await.unwrap();

    let last = SnapshotKey::from_millis(1000);
    assert_eq!(
        cache.listings(),
        vec![None, Some(last.as_str().to_string())]
    );
    // The follow-up page is empty, so the full page holds the latest key.
    assert_eq!(page.latest(), Some(&last));
}

#[tokio::test]
async fn partial_first_page_is_final() {
    let cache = seeded(999).await;
    let pager = KeyPager::new(cache.clone());

    let page = pager.latest_page().await.unwrap();

    assert_eq!(cache.listings(), vec![None]);
    assert_eq!(page.latest(), Some(&SnapshotKey::from_millis(999)));
}

#[tokio::test]
async fn latest_key_comes_from_the_last_page() {
    let cache = seeded(2500).await;
    let pager = KeyPager::new(cache.clone());

    let page = pager.latest_page().await.unwrap();

    assert_eq!(cache.listings().len(), 3);
    assert_eq!(page.count, 500);
    assert_eq!(page.latest(), Some(&SnapshotKey::from_millis(2500)));
}

#[tokio::test]
async fn stored_cursor_skips_earlier_pages() {
    let cache = seeded(2500).await;
    let cursors = Arc::new(MemoryCursorStore::default());
    let pager = KeyPager::new(cache.clone()).with_cursor_store(cursors.clone());

    pager.latest_page().await.unwrap();
    let stored = cursors.load().await.unwrap().unwrap();
    assert_eq!(stored, SnapshotKey::from_millis(2000).as_str());

    let before = cache.listings().len();
    let page = pager.latest_page().await.unwrap();

    let resumed = &cache.listings()[before..];
    assert_eq!(resumed, &[Some(stored)]);
    assert_eq!(page.latest(), Some(&SnapshotKey::from_millis(2500)));
}

#[tokio::test]
async fn reconciles_against_snapshot_beyond_first_page() {
    let cache = seeded(1200).await;
    let latest = SnapshotKey::from_millis(1201);
    let known = vec![planned("1", "Line 1: early closure", 1)];
    cache
        .seed(
            &latest,
            AlertSnapshot::new(latest.clone(), known.clone())
                .encode()
                .unwrap(),
        )
        .await;
    let pager = KeyPager::new(cache.clone());
    let engine = ReconciliationEngine::new(cache.clone());

    let page = pager.latest_page().await.unwrap();
    let plan = engine.reconcile(known, &page).await.unwrap();

    assert!(plan.is_noop());
    assert_eq!(
        plan.baseline,
        Baseline::Snapshot {
            key: latest,
            known: 1
        }
    );
}
