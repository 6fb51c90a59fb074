//! Snapshot key pagination.
//!
//! The reconciliation engine needs only the most recent snapshot key, which
//! lives on the final page of the listing. [`KeyPager`] follows continuation
//! cursors until it reaches a page that is not full, resuming from the last
//! persisted cursor when one is available.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::port::{CursorStore, KeyPage, SnapshotCache};

/// Walks the key listing to its final non-empty page.
pub struct KeyPager {
    cache: Arc<dyn SnapshotCache>,
    cursors: Option<Arc<dyn CursorStore>>,
}

impl KeyPager {
    /// Create a pager that always starts from the first page.
    #[must_use]
    pub fn new(cache: Arc<dyn SnapshotCache>) -> Self {
        Self {
            cache,
            cursors: None,
        }
    }

    /// Resume listings from, and remember cursors in, `cursors`.
    #[must_use]
    pub fn with_cursor_store(mut self, cursors: Arc<dyn CursorStore>) -> Self {
        self.cursors = Some(cursors);
        self
    }

    /// The final non-empty page of the listing, or an empty page when the
    /// cache holds no snapshots at all.
    ///
    /// # Errors
    /// Returns an error if a listing request fails.
    pub async fn latest_page(&self) -> Result<KeyPage> {
        if let Some(cursor) = self.stored_cursor().await {
            let page = self.follow(Some(cursor)).await?;
            if !page.is_empty() {
                return Ok(page);
            }
            debug!("Stored cursor yielded no keys, listing from the first page");
        }
        self.follow(None).await
    }

    async fn follow(&self, start: Option<String>) -> Result<KeyPage> {
        let page_size = self.cache.page_size();
        let mut page = self.cache.list_keys(start.as_deref()).await?;
        let mut pages = 1usize;

        while page.has_more(page_size) {
            let Some(cursor) = page.continuation().map(str::to_string) else {
                break;
            };
            let next = self.cache.list_keys(Some(&cursor)).await?;
            pages += 1;
            if next.is_empty() {
                break;
            }
            self.remember(&cursor).await;
            let stalled = next.continuation() == Some(cursor.as_str());
            page = next;
            if stalled {
                warn!(cursor = %cursor, "Key listing returned its own cursor, stopping");
                break;
            }
        }

        debug!(pages, keys = page.count, "Listed snapshot keys");
        Ok(page)
    }

    async fn stored_cursor(&self) -> Option<String> {
        let store = self.cursors.as_ref()?;
        match store.load().await {
            Ok(cursor) => cursor.filter(|c| !c.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to load pagination cursor, listing from the first page");
                None
            }
        }
    }

    async fn remember(&self, cursor: &str) {
        if let Some(store) = &self.cursors {
            if let Err(e) = store.save(cursor).await {
                warn!(error = %e, "Failed to persist pagination cursor");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::{MemoryCursorStore, MemorySnapshotCache};
    use crate::domain::SnapshotKey;

    async fn cache_with(keys: u64, page_size: usize) -> Arc<MemorySnapshotCache> {
        let cache = Arc::new(MemorySnapshotCache::with_page_size(page_size));
        for millis in 1..=keys {
            cache
                .put(&SnapshotKey::from_millis(millis), "[]".into())
                .await
                .unwrap();
        }
        cache
    }

    #[tokio::test]
    async fn empty_cache_yields_empty_page() {
        let pager = KeyPager::new(cache_with(0, 3).await);
        assert!(pager.latest_page().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn single_partial_page_is_final() {
        let pager = KeyPager::new(cache_with(2, 3).await);
        let page = pager.latest_page().await.unwrap();
        assert_eq!(page.latest(), Some(&SnapshotKey::from_millis(2)));
    }

    #[tokio::test]
    async fn follows_cursors_to_last_page() {
        let pager = KeyPager::new(cache_with(7, 3).await);
        let page = pager.latest_page().await.unwrap();
        assert_eq!(page.keys.len(), 1);
        assert_eq!(page.latest(), Some(&SnapshotKey::from_millis(7)));
    }

    #[tokio::test]
    async fn exact_multiple_keeps_last_full_page() {
        let pager = KeyPager::new(cache_with(6, 3).await);
        let page = pager.latest_page().await.unwrap();
        assert_eq!(page.latest(), Some(&SnapshotKey::from_millis(6)));
    }

    #[tokio::test]
    async fn persists_and_resumes_from_cursor() {
        let cache = cache_with(7, 3).await;
        let cursors = Arc::new(MemoryCursorStore::default());
        let pager = KeyPager::new(cache.clone()).with_cursor_store(cursors.clone());

        pager.latest_page().await.unwrap();
        let stored = cursors.load().await.unwrap();
        assert!(stored.is_some());

        cache
            .put(&SnapshotKey::from_millis(8), "[]".into())
            .await
            .unwrap();
        let page = pager.latest_page().await.unwrap();
        assert_eq!(page.latest(), Some(&SnapshotKey::from_millis(8)));
    }

    #[tokio::test]
    async fn stale_cursor_falls_back_to_full_listing() {
        let cache = cache_with(2, 3).await;
        let cursors = Arc::new(MemoryCursorStore::default());
        cursors
            .save(SnapshotKey::from_millis(99).as_str())
            .await
            .unwrap();
        let pager = KeyPager::new(cache).with_cursor_store(cursors);

        let page = pager.latest_page().await.unwrap();
        assert_eq!(page.latest(), Some(&SnapshotKey::from_millis(2)));
    }
}
