//! SQLite persistence adapters.
//!
//! Provides SQLite-backed implementations of the snapshot cache, the post
//! ledger and the listing cursor store using Diesel ORM.

pub mod cursor;
pub mod database;
pub mod ledger;
pub mod snapshot;

pub use cursor::SqliteCursorStore;
pub use database::connection::{create_pool, open, run_migrations, DbPool};
pub use ledger::SqlitePostLedger;
pub use snapshot::SqliteSnapshotCache;
