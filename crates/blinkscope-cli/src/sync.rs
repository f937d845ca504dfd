//! Companion repository sync: clone on first run, pull afterwards.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::progress::step_spinner;

/// Ensure the companion checkout exists and is reasonably fresh.
///
/// A failed pull leaves a usable (if stale) checkout behind, so it
/// only warns. A failed clone leaves nothing to launch and is fatal.
pub fn clone_or_update(dir: &Path, repo_url: &str) -> Result<()> {
    if dir.exists() {
        println!("BlinkScope repository already exists. Updating...");
        let spinner = step_spinner("Pulling latest changes...");
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .arg("pull")
            .status()
            .context("Failed to run git pull")?;
        spinner.finish_and_clear();

        if status.success() {
            println!("✓ Repository updated");
        } else {
            warn!(dir = %dir.display(), "git pull failed, keeping the existing checkout");
            eprintln!("Failed to update repository; continuing with the existing checkout.");
        }
        return Ok(());
    }

    let spinner = step_spinner("Setting up the local environment...");
    if let Some(parent) = dir.parent() {
        std::fs::create_dir_all(parent).context("Failed to create data directory")?;
    }
    let status = Command::new("git")
        .arg("clone")
        .arg(repo_url)
        .arg(dir)
        .status()
        .context("Failed to run git clone")?;
    spinner.finish_and_clear();

    if !status.success() {
        bail!("Failed to clone the companion repository from {repo_url}");
    }
    println!("✓ Repository cloned");
    Ok(())
}
