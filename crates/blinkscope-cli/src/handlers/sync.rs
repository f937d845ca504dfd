//! Sync command handler.

use anyhow::Result;

use blinkscope_core::paths::{ResolvedPaths, ensure_directory};
use blinkscope_core::settings::COMPANION_REPO_URL;

pub fn execute() -> Result<()> {
    let paths = ResolvedPaths::resolve()?;
    ensure_directory(&paths.data_root)?;
    crate::sync::clone_or_update(&paths.companion_dir, COMPANION_REPO_URL)
}
