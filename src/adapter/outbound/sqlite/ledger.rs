//! SQLite post ledger.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use super::database::connection::DbPool;
use super::database::model::PostRow;
use super::database::schema::posts;
use crate::domain::{AlertId, PostId};
use crate::error::{Error, Result};
use crate::port::{LedgerEntry, PostLedger};

/// SQLite-backed ledger. The first row for an alert is never replaced.
pub struct SqlitePostLedger {
    pool: DbPool,
}

impl SqlitePostLedger {
    /// Create a new SQLite post ledger with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostLedger for SqlitePostLedger {
    async fn find(&self, alert_id: &AlertId) -> Result<Option<LedgerEntry>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let row: Option<PostRow> = posts::table
            .find(alert_id.as_str())
            .select(PostRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.map(|r| LedgerEntry::new(AlertId::new(r.alert_id), PostId::new(r.post_id))))
    }

    async fn insert(&self, entry: &LedgerEntry) -> Result<bool> {
        let row = PostRow {
            alert_id: entry.alert_id.as_str().to_string(),
            post_id: entry.post_id.as_str().to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let inserted = diesel::insert_or_ignore_into(posts::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(inserted == 1)
    }
}
