//! CLI module graph and command dispatch.

pub mod command;
pub mod config;
pub mod output;
pub mod run;
pub mod token;

use command::{Cli, Commands, ConfigCommand};
use output::OutputConfig;

use crate::error::Result;

/// Apply global output flags and run the selected command.
///
/// # Errors
/// Returns the command's error for the binary to report.
pub async fn dispatch(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet), &cli.color);

    match &cli.command {
        Commands::Run(args) => run::execute(&cli.config, args).await,
        Commands::Once(args) => run::execute_once(&cli.config, args).await,
        Commands::RefreshToken => token::execute(&cli.config).await,
        Commands::Config(ConfigCommand::Validate) => config::execute_validate(&cli.config),
    }
}
