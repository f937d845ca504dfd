//! CLI entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use blinkscope_cli::{Cli, Commands, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Operator-facing output goes through println; tracing stays quiet
    // unless asked for
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    match cli.command {
        None | Some(Commands::Run) => handlers::run::execute(cli.target_url).await,
        Some(Commands::Sync) => handlers::sync::execute(),
        Some(Commands::Paths) => handlers::paths::execute(),
    }
}
