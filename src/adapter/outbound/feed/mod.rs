//! TTC live-alert feed adapter.

pub mod client;
pub mod dto;
pub mod settings;

pub use client::TtcFeedClient;
pub use settings::{FeedConfig, HttpConfig};
