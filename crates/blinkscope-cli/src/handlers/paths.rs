//! Paths command handler.
//!
//! Prints every path the tool touches, for diagnosing a misplaced
//! checkout or a stale port record.

use anyhow::Result;

use blinkscope_core::paths::ResolvedPaths;

pub fn execute() -> Result<()> {
    let paths = ResolvedPaths::resolve()?;
    for (name, path) in paths.entries() {
        println!("{name} = {}", path.display());
    }
    Ok(())
}
