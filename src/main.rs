use alertline::adapter::inbound::cli::command::Cli;
use alertline::adapter::inbound::cli::{dispatch, output};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}
