//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for the operator channels.

pub mod discord;
#[cfg(feature = "telegram")]
pub mod telegram;

pub use discord::{DiscordConfig, DiscordNotifier};
