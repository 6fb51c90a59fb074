//! Command-line interface definitions.
//!
//! Defines the CLI structure for the alertline daemon using `clap`: the
//! long-running scheduler, a single tick, a manual token refresh, and
//! configuration validation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Announce planned TTC service alerts on Threads
#[derive(Parser, Debug)]
#[command(name = "alertline")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the alertline CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the feed on a fixed cadence until interrupted
    Run(RunArgs),

    /// Run a single fetch, reconcile and publish tick
    Once(RunArgs),

    /// Exchange the Threads access token for a fresh one
    RefreshToken,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `alertline config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate a configuration file for correctness.
    Validate,
}

/// Arguments shared by `run` and `once`.
///
/// All fields override the corresponding configuration file values.
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Log posts instead of sending them to Threads.
    #[arg(long)]
    pub dry_run: bool,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,

    /// Override the SQLite database path.
    #[arg(long)]
    pub database: Option<PathBuf>,
}
