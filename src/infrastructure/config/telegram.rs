//! Telegram notification configuration.

use serde::Deserialize;

/// Telegram notification configuration.
///
/// Bot token and chat id come from `TELEGRAM_BOT_TOKEN` and
/// `TELEGRAM_CHAT_ID`; delivery needs the `telegram` feature.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramAppConfig {
    /// Enable telegram notifications.
    #[serde(default)]
    pub enabled: bool,
    /// Also report clean publish batches and token refreshes.
    #[serde(default)]
    pub notify_successes: bool,
}
