//! Operator notification configuration.

use serde::Deserialize;

const fn default_true() -> bool {
    true
}

/// Discord webhook notification configuration.
///
/// The webhook URL itself comes from `DISCORD_WEBHOOK_URL`.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    /// Send to Discord when a webhook URL is configured.
    #[serde(default = "default_true")]
    pub discord: bool,
    /// Also report clean publish batches and token refreshes.
    #[serde(default)]
    pub notify_successes: bool,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            discord: default_true(),
            notify_successes: false,
        }
    }
}
