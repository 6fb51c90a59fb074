//! Alertline - planned TTC service alerts, announced on Threads.
//!
//! Each tick fetches the TTC live-alert feed, keeps the planned alerts,
//! compares them with the most recent cached snapshot, and publishes the
//! new or changed ones. Updates to an alert that was already announced are
//! posted as quotes of the original post, found through the post ledger.
//!
//! # Architecture
//!
//! - **`domain`** - Alerts, snapshot keys, identifiers, post drafts
//! - **`port`** - Traits for the feed, snapshot cache, post ledger,
//!   posting platform and operator notifications
//! - **`application`** - Filtering, reconciliation, key pagination, paced
//!   publication, and the tick service tying them together
//! - **`adapter`** - TTC feed client, Threads client, SQLite stores,
//!   Discord and Telegram notifiers, the CLI
//! - **`infrastructure`** - Configuration, wiring, and the scheduler
//!
//! # Features
//!
//! - `telegram` - Telegram operator notifications
//! - `testkit` - Scripted fakes and fixtures for integration tests
//!
//! # Example
//!
//! ```no_run
//! use alertline::application::{cold_start, order, select};
//! use alertline::domain::Alert;
//!
//! let current = order(select(vec![Alert::new("1", "Line 1 closure")]));
//! let plan = cold_start(current);
//! assert_eq!(plan.to_publish.len(), 1);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
