//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{cursors, posts, snapshots};

/// Database row for a cached snapshot.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SnapshotRow {
    pub key: String,
    pub alerts: String,
    pub written_at: String,
}

/// Database row for a ledger entry.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PostRow {
    pub alert_id: String,
    pub post_id: String,
    pub created_at: String,
}

/// Database row for the listing cursor. There is only ever one, at id 1.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = cursors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CursorRow {
    pub id: i32,
    pub cursor: String,
    pub updated_at: String,
}
