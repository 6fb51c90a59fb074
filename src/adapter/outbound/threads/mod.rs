//! Threads (Graph API) posting adapter.
//!
//! Publication is the two-step container flow; the access token is read
//! from a [`CredentialProvider`](crate::port::CredentialProvider) on every
//! request so a refresh applies without rebuilding the client.

pub mod client;
pub mod credential;
pub mod dry_run;
pub mod dto;
pub mod refresh;
pub mod settings;

pub use client::ThreadsClient;
pub use credential::{RefreshableToken, StaticToken};
pub use dry_run::DryRunPoster;
pub use refresh::ThreadsTokenRefresher;
pub use settings::ThreadsConfig;
