//! SQLite store for the last listing cursor.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use super::database::connection::DbPool;
use super::database::model::CursorRow;
use super::database::schema::cursors;
use crate::error::{Error, Result};
use crate::port::CursorStore;

const CURSOR_ROW_ID: i32 = 1;

pub struct SqliteCursorStore {
    pool: DbPool,
}

impl SqliteCursorStore {
    /// Create a new SQLite cursor store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CursorStore for SqliteCursorStore {
    async fn load(&self) -> Result<Option<String>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        cursors::table
            .find(CURSOR_ROW_ID)
            .select(cursors::cursor)
            .first::<String>(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn save(&self, cursor: &str) -> Result<()> {
        let row = CursorRow {
            id: CURSOR_ROW_ID,
            cursor: cursor.to_string(),
            updated_at: Utc::now().to_rfc3339(),
        };
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::replace_into(cursors::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}
