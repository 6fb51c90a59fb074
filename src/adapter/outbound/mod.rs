//! Outbound adapters (driven side).

pub mod feed;
pub mod memory;
pub mod notifier;
pub mod sqlite;
pub mod threads;
