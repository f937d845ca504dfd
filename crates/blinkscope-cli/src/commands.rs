//! Subcommands for the bootstrapper.

use clap::Subcommand;

/// Available commands. Running with none is equivalent to `run`.
#[derive(Subcommand)]
pub enum Commands {
    /// Bootstrap the debugger and start its dev server
    Run,

    /// Clone or update the companion project without starting anything
    Sync,

    /// Show resolved paths for all blinkscope files
    Paths,
}
