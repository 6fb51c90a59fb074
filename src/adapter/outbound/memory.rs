//! In-memory store implementations for tests and dry runs.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{AlertId, SnapshotKey};
use crate::error::Result;
use crate::port::{CursorStore, KeyPage, LedgerEntry, PostLedger, SnapshotCache, DEFAULT_PAGE_SIZE};

/// Snapshot cache over a sorted map, listed with key-order cursors.
#[derive(Debug)]
pub struct MemorySnapshotCache {
    values: RwLock<BTreeMap<SnapshotKey, String>>,
    page_size: usize,
}

impl MemorySnapshotCache {
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl Default for MemorySnapshotCache {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

#[async_trait]
impl SnapshotCache for MemorySnapshotCache {
    async fn put(&self, key: &SnapshotKey, value: String) -> Result<()> {
        self.values.write().insert(key.clone(), value);
        Ok(())
    }

    async fn get(&self, key: &SnapshotKey) -> Result<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn list_keys(&self, cursor: Option<&str>) -> Result<KeyPage> {
        let values = self.values.read();
        let keys: Vec<SnapshotKey> = values
            .keys()
            .filter(|key| cursor.map_or(true, |c| key.as_str() > c))
            .take(self.page_size)
            .cloned()
            .collect();
        let next_cursor = (keys.len() == self.page_size)
            .then(|| keys.last().map(|k| k.as_str().to_string()))
            .flatten();
        Ok(KeyPage::new(keys, next_cursor))
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}

/// Post ledger over a hash map.
#[derive(Debug, Default)]
pub struct MemoryPostLedger {
    entries: RwLock<HashMap<AlertId, LedgerEntry>>,
}

impl MemoryPostLedger {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl PostLedger for MemoryPostLedger {
    async fn find(&self, alert_id: &AlertId) -> Result<Option<LedgerEntry>> {
        Ok(self.entries.read().get(alert_id).cloned())
    }

    async fn insert(&self, entry: &LedgerEntry) -> Result<bool> {
        let mut entries = self.entries.write();
        if entries.contains_key(&entry.alert_id) {
            return Ok(false);
        }
        entries.insert(entry.alert_id.clone(), entry.clone());
        Ok(true)
    }
}

#[derive(Debug, Default)]
pub struct MemoryCursorStore {
    cursor: RwLock<Option<String>>,
}

#[async_trait]
impl CursorStore for MemoryCursorStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.cursor.read().clone())
    }

    async fn save(&self, cursor: &str) -> Result<()> {
        *self.cursor.write() = Some(cursor.to_string());
        Ok(())
    }
}
