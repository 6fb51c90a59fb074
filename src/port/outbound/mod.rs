//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies such as the alert
//! feed, snapshot storage, the post ledger, the posting platform, and
//! operator notifications.

pub mod cache;
pub mod credential;
pub mod ledger;
pub mod notifier;
pub mod posting;
pub mod source;
