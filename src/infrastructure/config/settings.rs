//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; secrets are only ever read from
//! the environment (`THREADS_ACCESS_TOKEN`, `THREADS_USER_ID`,
//! `DISCORD_WEBHOOK_URL`).
//!
//! # Example
//!
//! ```no_run
//! use alertline::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::cache::CacheConfig;
use super::logging::{LoggingConfig, LOG_FORMATS};
use super::notifier::NotifierConfig;
use super::schedule::ScheduleConfig;
use super::telegram::TelegramAppConfig;
use crate::adapter::outbound::feed::{FeedConfig, HttpConfig};
use crate::adapter::outbound::threads::ThreadsConfig;
use crate::error::{ConfigError, Result};

/// Credentials taken from the environment.
#[derive(Clone, Default)]
pub struct Secrets {
    pub threads_access_token: Option<String>,
    pub discord_webhook_url: Option<String>,
}

impl Secrets {
    fn from_env() -> Self {
        Self {
            threads_access_token: non_empty_env("THREADS_ACCESS_TOKEN"),
            discord_webhook_url: non_empty_env("DISCORD_WEBHOOK_URL"),
        }
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Secrets")
            .field("threads_access_token", &redact(&self.threads_access_token))
            .field("discord_webhook_url", &redact(&self.discord_webhook_url))
            .finish()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upstream alert feed.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Threads publishing endpoints and post formatting.
    #[serde(default)]
    pub threads: ThreadsConfig,

    /// Tick, pacing and token refresh cadence.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Snapshot key listing.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Discord operator notifications.
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Telegram operator notifications.
    #[serde(default)]
    pub telegram: TelegramAppConfig,

    /// Path to SQLite database file.
    ///
    /// Defaults to "alertline.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Log posts instead of sending them.
    ///
    /// Snapshot and ledger bookkeeping still run. Defaults to false.
    #[serde(default)]
    pub dry_run: bool,

    /// Populated from the environment, never from the file.
    #[serde(skip)]
    pub secrets: Secrets,
}

fn default_database_path() -> String {
    "alertline.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            feed: FeedConfig::default(),
            threads: ThreadsConfig::default(),
            schedule: ScheduleConfig::default(),
            cache: CacheConfig::default(),
            notifier: NotifierConfig::default(),
            telegram: TelegramAppConfig::default(),
            database: default_database_path(),
            dry_run: false,
            secrets: Secrets::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content and apply environment secrets.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., a zero interval or an unparsable URL)
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Secrets come from the environment only
        config.secrets = Secrets::from_env();
        if config.threads.user_id.is_none() {
            config.threads.user_id = non_empty_env("THREADS_USER_ID");
        }
        if let Some(token) = read_token_file(config.threads.token_file.as_deref())? {
            config.secrets.threads_access_token = Some(token);
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// Checks that intervals are non-zero, URLs parse and enumerated
    /// settings hold a known value.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }

        validate_url("feed.url", &self.feed.url)?;
        validate_url("threads.api_url", &self.threads.api_url)?;
        validate_url("threads.graph_url", &self.threads.graph_url)?;
        if let Some(webhook) = &self.secrets.discord_webhook_url {
            validate_url("DISCORD_WEBHOOK_URL", webhook)?;
        }

        validate_http("feed.http", &self.feed.http)?;
        validate_http("threads.http", &self.threads.http)?;

        if self.schedule.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "schedule.poll_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.schedule.token_refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "schedule.token_refresh_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.cache.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.page_size",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        Ok(())
    }

    /// Threads user id and access token, required unless running dry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the first absent value.
    #[allow(clippy::result_large_err)]
    pub fn threads_credentials(&self) -> Result<(String, String)> {
        let user_id = self
            .threads
            .user_id
            .clone()
            .ok_or(ConfigError::MissingField {
                field: "THREADS_USER_ID",
            })?;
        let token = self
            .secrets
            .threads_access_token
            .clone()
            .ok_or(ConfigError::MissingField {
                field: "THREADS_ACCESS_TOKEN",
            })?;
        Ok((user_id, token))
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

/// A missing token file is not an error; the first refresh creates it.
#[allow(clippy::result_large_err)]
fn read_token_file(path: Option<&str>) -> Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents.trim().to_string()).filter(|t| !t.is_empty())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::ReadFile(e).into()),
    }
}

#[allow(clippy::result_large_err)]
fn validate_url(field: &'static str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("unsupported scheme {}", url.scheme()),
        }
        .into());
    }
    Ok(())
}

#[allow(clippy::result_large_err)]
fn validate_http(field: &'static str, http: &HttpConfig) -> Result<()> {
    if http.timeout_ms == 0 || http.connect_timeout_ms == 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "timeouts must be greater than 0".to_string(),
        }
        .into());
    }
    if http.retry_max_attempts == 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "retry_max_attempts must be at least 1".to_string(),
        }
        .into());
    }
    Ok(())
}
