//! Composition root: builds the alert service and its collaborators from
//! configuration.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::adapter::outbound::feed::TtcFeedClient;
use crate::adapter::outbound::notifier::{DiscordConfig, DiscordNotifier};
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{TelegramConfig, TelegramNotifier};
use crate::adapter::outbound::sqlite::{
    open, SqliteCursorStore, SqlitePostLedger, SqliteSnapshotCache,
};
use crate::adapter::outbound::threads::{
    DryRunPoster, RefreshableToken, ThreadsClient, ThreadsTokenRefresher,
};
use crate::application::{AlertService, KeyPager, Publisher, PublisherConfig};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::{
    CursorStore, LogNotifier, Notifier, NotifierRegistry, PostingApi, SnapshotCache,
    TokenRefresher,
};

/// Everything the scheduler drives.
pub struct Runtime {
    pub service: AlertService,
    /// Absent in dry runs.
    pub refresher: Option<Arc<dyn TokenRefresher>>,
    pub notifier: Arc<dyn Notifier>,
}

/// Build notifier registry from configuration.
///
/// Always includes the log notifier. Must be called from within a Tokio
/// runtime when a webhook or Telegram channel is configured.
#[must_use]
pub fn build_notifier_registry(config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));

    if config.notifier.discord {
        if let Some(webhook_url) = config.secrets.discord_webhook_url.clone() {
            registry.register(Box::new(DiscordNotifier::new(DiscordConfig {
                webhook_url,
                notify_successes: config.notifier.notify_successes,
            })));
            info!("Discord notifier enabled");
        }
    }

    register_telegram(config, &mut registry);
    registry
}

#[cfg(feature = "telegram")]
fn register_telegram(config: &Config, registry: &mut NotifierRegistry) {
    if !config.telegram.enabled {
        return;
    }
    if let Some(tg_config) = TelegramConfig::from_env(config.telegram.notify_successes) {
        registry.register(Box::new(TelegramNotifier::new(tg_config)));
        info!("Telegram notifier enabled");
    } else {
        warn!("Telegram enabled but TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set");
    }
}

#[cfg(not(feature = "telegram"))]
fn register_telegram(config: &Config, _registry: &mut NotifierRegistry) {
    if config.telegram.enabled {
        warn!("Telegram enabled in config but the telegram feature is not compiled in");
    }
}

/// Build the posting API and, outside dry runs, the token refresher that
/// shares its credential.
///
/// # Errors
/// Returns a configuration error when a live run lacks Threads credentials.
#[allow(clippy::type_complexity)]
pub fn build_posting(
    config: &Config,
) -> Result<(Arc<dyn PostingApi>, Option<Arc<dyn TokenRefresher>>)> {
    if config.dry_run {
        info!("Dry run: posts are logged, not sent");
        return Ok((Arc::new(DryRunPoster::new()), None));
    }

    let (user_id, token) = config.threads_credentials()?;
    let token = Arc::new(RefreshableToken::new(Some(token)));
    let client = ThreadsClient::from_config(&config.threads, user_id, token.clone());
    let refresher = ThreadsTokenRefresher::from_config(&config.threads, token);
    Ok((Arc::new(client), Some(Arc::new(refresher))))
}

/// Build a standalone token refresher for one-off use.
///
/// # Errors
/// Returns a configuration error when no access token is configured.
pub fn build_refresher(config: &Config) -> Result<Arc<dyn TokenRefresher>> {
    let (_, token) = config.threads_credentials()?;
    let token = Arc::new(RefreshableToken::new(Some(token)));
    Ok(Arc::new(ThreadsTokenRefresher::from_config(
        &config.threads,
        token,
    )))
}

/// Wire the alert service against the configured database and endpoints.
///
/// # Errors
/// Returns an error if the database cannot be opened or migrated, or a live
/// run lacks Threads credentials.
pub fn build_runtime(config: &Config, shutdown: watch::Receiver<bool>) -> Result<Runtime> {
    let pool = open(&config.database)?;
    info!(database = %config.database, "Database ready");

    let cache: Arc<dyn SnapshotCache> = Arc::new(SqliteSnapshotCache::with_page_size(
        pool.clone(),
        config.cache.page_size,
    ));
    let ledger = Arc::new(SqlitePostLedger::new(pool.clone()));
    let mut pager = KeyPager::new(Arc::clone(&cache));
    if config.cache.persist_cursor {
        let cursors: Arc<dyn CursorStore> = Arc::new(SqliteCursorStore::new(pool));
        pager = pager.with_cursor_store(cursors);
    }

    let (posting, refresher) = build_posting(config)?;
    let publisher = Publisher::new(
        posting,
        ledger,
        Arc::clone(&cache),
        PublisherConfig {
            post_interval: config.schedule.post_interval(),
            include_route_tag: config.threads.include_route_tag,
        },
    )
    .with_shutdown(shutdown);

    let notifier: Arc<dyn Notifier> = Arc::new(build_notifier_registry(config));
    let source = Arc::new(TtcFeedClient::from_config(&config.feed));
    let service = AlertService::new(source, cache, pager, publisher, Arc::clone(&notifier));

    Ok(Runtime {
        service,
        refresher,
        notifier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dry_config(dir: &tempfile::TempDir) -> Config {
        let mut config = Config::parse_toml("dry_run = true").unwrap();
        config.database = dir.path().join("alertline.db").display().to_string();
        config
    }

    #[tokio::test]
    async fn dry_run_builds_without_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = dry_config(&dir);
        config.secrets.threads_access_token = None;
        let (_tx, rx) = watch::channel(false);

        let runtime = build_runtime(&config, rx).unwrap();

        assert!(runtime.refresher.is_none());
    }

    #[tokio::test]
    async fn live_run_requires_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = dry_config(&dir);
        config.dry_run = false;
        config.threads.user_id = None;
        let (_tx, rx) = watch::channel(false);

        assert!(build_runtime(&config, rx).is_err());
    }

    #[tokio::test]
    async fn live_run_shares_token_with_refresher() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = dry_config(&dir);
        config.dry_run = false;
        config.threads.user_id = Some("42".into());
        config.secrets.threads_access_token = Some("tok".into());

        let (posting, refresher) = build_posting(&config).unwrap();

        assert_eq!(posting.platform_name(), "threads");
        assert!(refresher.is_some());
    }

    #[test]
    fn registry_always_has_log_notifier() {
        let mut config = Config::default();
        config.secrets.discord_webhook_url = None;
        assert_eq!(build_notifier_registry(&config).len(), 1);
    }
}
