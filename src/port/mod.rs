//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the seams between the reconciliation core and the outside
//! world. Adapters implement them for concrete services; tests implement
//! them with scripted fakes.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  filter · reconcile ·   │
//!     ┌──────────────┤  publish · service      ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                   │              │                    │
//!     ▼                   ▼              ▼                    ▼
//! ┌─────────┐      ┌────────────┐  ┌──────────┐        ┌───────────┐
//! │  Feed   │      │  Snapshot  │  │  Post    │        │ Posting / │
//! │ Adapter │      │  Cache     │  │  Ledger  │        │ Notifier  │
//! └─────────┘      └────────────┘  └──────────┘        └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`AlertSource`] - Upstream alert feed
//! - [`SnapshotCache`], [`CursorStore`] - Snapshot persistence and key pagination
//! - [`PostLedger`] - Alert id to announcing post id mapping
//! - [`PostingApi`], [`CredentialProvider`], [`TokenRefresher`] - Publication platform
//! - [`Notifier`] - Operator notifications

pub mod outbound;

pub use outbound::cache::{CursorStore, KeyPage, SnapshotCache, DEFAULT_PAGE_SIZE};
pub use outbound::credential::{CredentialProvider, TokenRefresher};
pub use outbound::ledger::{LedgerEntry, PostLedger};
pub use outbound::notifier::{
    Event, LogNotifier, Notifier, NotifierRegistry, NullNotifier, PublishSummaryEvent,
    RunFailureEvent,
};
pub use outbound::posting::{ApiFailure, ContainerOutcome, PostingApi, PublishOutcome};
pub use outbound::source::{AlertSource, FeedSnapshot};
