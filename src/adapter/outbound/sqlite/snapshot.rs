//! SQLite snapshot cache.
//!
//! Keys are fixed-width digit strings, so ordering the primary key as text
//! lists snapshots chronologically.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use tracing::warn;

use super::database::connection::DbPool;
use super::database::model::SnapshotRow;
use super::database::schema::snapshots;
use crate::domain::SnapshotKey;
use crate::error::{Error, Result};
use crate::port::{KeyPage, SnapshotCache, DEFAULT_PAGE_SIZE};

/// SQLite-backed snapshot cache with keyset pagination.
pub struct SqliteSnapshotCache {
    pool: DbPool,
    page_size: usize,
}

impl SqliteSnapshotCache {
    /// Create a new SQLite snapshot cache with the default page size.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self::with_page_size(pool, DEFAULT_PAGE_SIZE)
    }

    #[must_use]
    pub fn with_page_size(pool: DbPool, page_size: usize) -> Self {
        Self {
            pool,
            page_size: page_size.max(1),
        }
    }
}

#[async_trait]
impl SnapshotCache for SqliteSnapshotCache {
    async fn put(&self, key: &SnapshotKey, value: String) -> Result<()> {
        let row = SnapshotRow {
            key: key.as_str().to_string(),
            alerts: value,
            written_at: Utc::now().to_rfc3339(),
        };
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::replace_into(snapshots::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, key: &SnapshotKey) -> Result<Option<String>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        snapshots::table
            .find(key.as_str())
            .select(snapshots::alerts)
            .first::<String>(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn list_keys(&self, cursor: Option<&str>) -> Result<KeyPage> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let limit = i64::try_from(self.page_size).unwrap_or(i64::MAX);
        let mut query = snapshots::table
            .select(snapshots::key)
            .order(snapshots::key.asc())
            .limit(limit)
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            query = query.filter(snapshots::key.gt(cursor.to_string()));
        }

        let raw: Vec<String> = query
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let next_cursor = (raw.len() == self.page_size)
            .then(|| raw.last().cloned())
            .flatten();
        let count = raw.len();
        let keys = raw
            .into_iter()
            .filter_map(|k| match SnapshotKey::parse(&k) {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed snapshot key");
                    None
                }
            })
            .collect();

        Ok(KeyPage {
            keys,
            count,
            next_cursor,
        })
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::open;

    fn cache(page_size: usize) -> SqliteSnapshotCache {
        SqliteSnapshotCache::with_page_size(open(":memory:").unwrap(), page_size)
    }

    #[tokio::test]
    async fn put_then_get_returns_value() {
        let cache = cache(10);
        let key = SnapshotKey::from_millis(42);
        cache.put(&key, "[]".into()).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let cache = cache(10);
        assert!(cache
            .get(&SnapshotKey::from_millis(1))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn put_same_key_overwrites() {
        let cache = cache(10);
        let key = SnapshotKey::from_millis(7);
        cache.put(&key, "[1]".into()).await.unwrap();
        cache.put(&key, "[2]".into()).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("[2]"));
        assert_eq!(cache.list_keys(None).await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn lists_chronologically_across_pages() {
        let cache = cache(2);
        for millis in [30, 10, 20] {
            cache
                .put(&SnapshotKey::from_millis(millis), "[]".into())
                .await
                .unwrap();
        }

        let first = cache.list_keys(None).await.unwrap();
        assert_eq!(
            first.keys,
            vec![SnapshotKey::from_millis(10), SnapshotKey::from_millis(20)]
        );
        assert!(first.has_more(2));

        let second = cache.list_keys(first.continuation()).await.unwrap();
        assert_eq!(second.keys, vec![SnapshotKey::from_millis(30)]);
        assert!(!second.has_more(2));
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped_but_counted() {
        let pool = open(":memory:").unwrap();
        {
            let mut conn = pool.get().unwrap();
            diesel::insert_into(snapshots::table)
                .values(&SnapshotRow {
                    key: "not-a-key".into(),
                    alerts: "[]".into(),
                    written_at: Utc::now().to_rfc3339(),
                })
                .execute(&mut conn)
                .unwrap();
        }
        let cache = SqliteSnapshotCache::with_page_size(pool, 10);
        cache
            .put(&SnapshotKey::from_millis(5), "[]".into())
            .await
            .unwrap();

        let page = cache.list_keys(None).await.unwrap();
        assert_eq!(page.keys, vec![SnapshotKey::from_millis(5)]);
        assert_eq!(page.count, 2);
    }
}
