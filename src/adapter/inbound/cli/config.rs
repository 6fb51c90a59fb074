//! Handler for the `config` command group.

use std::path::Path;

use super::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute `config validate`.
///
/// Missing credentials are reported as warnings: a file is valid on its
/// own, and the secrets may be supplied by the environment at run time.
pub fn execute_validate(path: &Path) -> Result<()> {
    let config = Config::load(path)?;

    output::section("Configuration");
    output::success("Configuration is valid");
    output::field("Path", path.display());
    output::field("Feed", &config.feed.url);
    output::field("Database", &config.database);
    output::field("Dry run", config.dry_run);

    for warning in readiness_warnings(&config) {
        output::warning(&warning);
    }
    Ok(())
}

/// Problems that would stop or degrade a live run.
#[must_use]
pub fn readiness_warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();
    if !config.dry_run {
        if let Err(e) = config.threads_credentials() {
            warnings.push(format!("Live posting unavailable: {e}"));
        }
    }
    if config.notifier.discord && config.secrets.discord_webhook_url.is_none() {
        warnings.push("Discord notifications enabled but DISCORD_WEBHOOK_URL is not set".into());
    }
    warnings
}
