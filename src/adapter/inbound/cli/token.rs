//! Handler for the `refresh-token` command.

use std::path::Path;

use super::output;
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_notifier_registry, build_refresher};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::scheduler::refresh_token;

/// Execute `refresh-token`. The token itself is never printed.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_logging();

    let refresher = build_refresher(&config)?;
    let notifier = build_notifier_registry(&config);
    refresh_token(refresher.as_ref(), &notifier).await?;

    output::success("Access token refreshed");
    match &config.threads.token_file {
        Some(path) => output::field("Saved to", path),
        None => output::warning(
            "threads.token_file is not set; update THREADS_ACCESS_TOKEN if the token changed",
        ),
    }
    Ok(())
}
