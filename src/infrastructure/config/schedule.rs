//! Cadence configuration.

use std::time::Duration;

use serde::Deserialize;

/// How often each job runs.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between alert ticks.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Seconds to wait between consecutive posts in one batch.
    #[serde(default = "default_post_interval_secs")]
    pub post_interval_secs: u64,
    /// Seconds between access token refreshes.
    #[serde(default = "default_token_refresh_interval_secs")]
    pub token_refresh_interval_secs: u64,
    /// Refresh the token right after startup instead of one interval later.
    #[serde(default)]
    pub refresh_token_on_start: bool,
}

const fn default_poll_interval_secs() -> u64 {
    60
}

const fn default_post_interval_secs() -> u64 {
    60
}

/// One week.
const fn default_token_refresh_interval_secs() -> u64 {
    7 * 24 * 60 * 60
}

impl ScheduleConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub fn post_interval(&self) -> Duration {
        Duration::from_secs(self.post_interval_secs)
    }

    #[must_use]
    pub fn token_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.token_refresh_interval_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            post_interval_secs: default_post_interval_secs(),
            token_refresh_interval_secs: default_token_refresh_interval_secs(),
            refresh_token_on_start: false,
        }
    }
}
