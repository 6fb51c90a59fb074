//! Infrastructure configuration modules.

pub mod cache;
pub mod logging;
pub mod notifier;
pub mod schedule;
pub mod settings;
pub mod telegram;

pub use settings::{Config, Secrets};
