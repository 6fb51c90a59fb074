//! Snapshot cache and pagination cursor ports.

use async_trait::async_trait;

use crate::domain::SnapshotKey;
use crate::error::Result;

/// Page size stores use when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// One page of a snapshot key listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPage {
    /// Keys on this page, in listing order.
    pub keys: Vec<SnapshotKey>,
    /// Number of keys the store reports for this page.
    pub count: usize,
    /// Cursor for the following page, if the store returned one.
    pub next_cursor: Option<String>,
}

impl KeyPage {
    /// Create a page whose count is the number of keys it holds.
    #[must_use]
    pub fn new(keys: Vec<SnapshotKey>, next_cursor: Option<String>) -> Self {
        Self {
            count: keys.len(),
            keys,
            next_cursor,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// A full page with a non-empty cursor means more keys may follow.
    #[must_use]
    pub fn has_more(&self, page_size: usize) -> bool {
        self.count >= page_size && self.continuation().is_some()
    }

    /// The continuation cursor, ignoring empty strings.
    #[must_use]
    pub fn continuation(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }

    /// Most recent key on this page.
    ///
    /// Keys sort chronologically, so this is the greatest key, which is also
    /// the last one for stores that list in key order.
    #[must_use]
    pub fn latest(&self) -> Option<&SnapshotKey> {
        self.keys.iter().max()
    }
}

/// Durable key/value store of published alert snapshots.
///
/// Values are JSON-encoded alert arrays. Puts are atomic per key.
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// Store a snapshot value, replacing any value under the same key.
    async fn put(&self, key: &SnapshotKey, value: String) -> Result<()>;

    /// Read the raw value under a key.
    async fn get(&self, key: &SnapshotKey) -> Result<Option<String>>;

    /// List keys after `cursor`, one page at a time.
    async fn list_keys(&self, cursor: Option<&str>) -> Result<KeyPage>;

    /// Page size this store lists with.
    fn page_size(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }
}

/// Auxiliary store for the last continuation cursor.
///
/// Persisting the cursor only saves listing traffic; losing it is safe.
#[async_trait]
pub trait CursorStore: Send + Sync {
    async fn load(&self) -> Result<Option<String>>;

    async fn save(&self, cursor: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: u64) -> Vec<SnapshotKey> {
        (1..=n).map(SnapshotKey::from_millis).collect()
    }

    #[test]
    fn full_page_with_cursor_has_more() {
        let page = KeyPage::new(keys(3), Some("c".into()));
        assert!(page.has_more(3));
        assert!(!page.has_more(4));
    }

    #[test]
    fn empty_cursor_means_no_more() {
        let page = KeyPage::new(keys(3), Some(String::new()));
        assert!(!page.has_more(3));
        assert!(page.continuation().is_none());
    }

    #[test]
    fn latest_is_greatest_key() {
        let mut ks = keys(5);
        ks.swap(1, 4);
        let page = KeyPage::new(ks, None);
        assert_eq!(page.latest(), Some(&SnapshotKey::from_millis(5)));
    }
}
