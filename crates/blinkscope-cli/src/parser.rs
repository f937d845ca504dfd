//! Top-level argument parser and global options.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the BlinkScope bootstrapper.
///
/// Running without a subcommand performs the full bootstrap: sync the
/// companion debugger project, free a port, and start the dev server.
#[derive(Parser)]
#[command(name = "blinkscope")]
#[command(about = "Your friendly local Solana Blinks debugger")]
#[command(version)]
pub struct Cli {
    /// Blink URL to open in the debugger once it is running
    #[arg(long = "url", global = true)]
    pub target_url: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
