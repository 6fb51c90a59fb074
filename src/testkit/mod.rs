//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`fixture`] - Alert and feed builders.
//! - [`fake`] - Scripted implementations of the outbound ports:
//!   `ScriptedPoster`, `ScriptedSource`, `RecordingCache`, `FlakyLedger`,
//!   `RecordingNotifier`.
//! - [`http`] - A loopback HTTP server that replays canned responses.

pub mod fake;
pub mod fixture;
pub mod http;
