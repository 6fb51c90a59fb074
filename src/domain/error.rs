//! Domain validation errors for core domain types.
//!
//! These errors are returned by constructors that validate inputs, such as
//! [`SnapshotKey::from_feed_timestamp`](super::snapshot::SnapshotKey::from_feed_timestamp).

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The feed reported a `lastUpdated` value that is not an RFC 3339 timestamp.
    #[error("invalid feed timestamp '{value}': {reason}")]
    InvalidTimestamp {
        /// The raw value that was provided.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Snapshot keys are 20 ASCII digits.
    #[error("malformed snapshot key '{0}'")]
    MalformedKey(String),

    /// Alerts must carry a non-empty identifier.
    #[error("alert id cannot be empty")]
    EmptyAlertId,
}
