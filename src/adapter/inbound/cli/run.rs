//! Handlers for the `run` and `once` commands.

use std::path::Path;

use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use super::command::RunArgs;
use super::output;
use crate::application::{AlertOutcome, PublishReport, RunOutcome};
use crate::error::Result;
use crate::infrastructure::bootstrap::build_runtime;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::scheduler;

/// Load configuration and apply command-line overrides.
///
/// # Errors
/// Returns an error if the file cannot be loaded or the overridden values
/// fail validation.
pub fn load_config(path: &Path, args: &RunArgs) -> Result<Config> {
    let mut config = Config::load(path)?;
    if args.dry_run {
        config.dry_run = true;
    }
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs || output::is_json() {
        config.logging.format = "json".to_string();
    }
    if let Some(database) = &args.database {
        config.database = database.to_string_lossy().to_string();
    }
    config.validate()?;
    Ok(config)
}

/// Execute the run command: tick on the configured cadence until ctrl-c.
pub async fn execute(config_path: &Path, args: &RunArgs) -> Result<()> {
    let config = load_config(config_path, args)?;
    config.init_logging();
    print_startup(&config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let runtime = build_runtime(&config, shutdown_rx.clone())?;

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                warn!(error = %e, "Cannot listen for ctrl-c; stop the process externally");
                std::future::pending::<()>().await;
            }
        }
        let _ = shutdown_tx.send(true);
    });

    scheduler::run(runtime, &config.schedule, shutdown_rx).await;
    output::success("Stopped");
    Ok(())
}

/// Execute the once command: a single tick, then exit.
pub async fn execute_once(config_path: &Path, args: &RunArgs) -> Result<()> {
    let config = load_config(config_path, args)?;
    config.init_logging();
    print_startup(&config);

    // Held for the lifetime of the tick so pacing is never interrupted.
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let runtime = build_runtime(&config, shutdown_rx)?;

    match runtime.service.run_once().await? {
        RunOutcome::Idle { key } => {
            output::section("Tick");
            output::field("Snapshot", key);
            output::note("No new or changed alerts");
        }
        RunOutcome::Published(report) => print_report(&report),
    }
    Ok(())
}

fn print_startup(config: &Config) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Feed", &config.feed.url);
    output::field("Database", &config.database);
    output::field(
        "Poll interval",
        format!("{}s", config.schedule.poll_interval_secs),
    );
    if config.dry_run {
        output::warning("Dry-run mode enabled - posts will be logged, not sent");
    }
}

fn print_report(report: &PublishReport) {
    output::section("Tick");
    output::field("Snapshot", &report.snapshot_key);
    output::field("Published", report.published());
    output::field("Skipped", report.skipped());
    output::field("Failed", report.failed());
    output::field("Not attempted", report.not_attempted());

    for result in &report.results {
        match &result.outcome {
            AlertOutcome::Published { post_id, quoted } => match quoted {
                Some(root) => output::success(&format!(
                    "{} updated as {post_id} (quoting {root})",
                    result.alert_id
                )),
                None => output::success(&format!("{} posted as {post_id}", result.alert_id)),
            },
            AlertOutcome::Failed(reason) => {
                output::warning(&format!("{} failed: {reason}", result.alert_id));
            }
            AlertOutcome::Skipped(_) | AlertOutcome::NotAttempted => {}
        }
    }
    if let Some(reason) = &report.aborted {
        output::warning(&format!("Batch aborted: {reason}"));
    }
}
