//! Persisted record of the last successfully allocated port.
//!
//! Format: a single base-10 integer in a plain-text file. The record
//! has exactly one writer (the allocator) and is read once at startup.

use std::fs;
use std::io;
use std::path::Path;

/// Read the last allocated port. Returns `None` when the file is
/// missing or its content does not parse; the caller falls back to the
/// base port.
pub fn read_last_port(path: &Path) -> Option<u16> {
    let content = fs::read_to_string(path).ok()?;
    content.trim().parse().ok()
}

/// Record `port` as the most recent allocation.
///
/// Written via temp file + rename so a crash mid-write never leaves a
/// half-written record behind.
pub fn write_last_port(path: &Path, port: u16) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, format!("{port}\n"))?;
    fs::rename(&temp_path, path)
}
