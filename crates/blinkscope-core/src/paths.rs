//! Path resolution for blinkscope data files.
//!
//! Everything the tool persists lives under one data root: the
//! companion project checkout, the last-port record, and the `.env`
//! written into the checkout. Components never read these locations
//! from ambient state; adapters resolve them here once and pass them
//! into constructors, which is what lets tests redirect the whole tree
//! to a temporary directory.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "BLINKSCOPE_DATA_DIR";

/// Directory name of the companion checkout inside the data root.
const COMPANION_DIR_NAME: &str = "blinks-debugger";

/// File name of the persisted last-allocated-port record.
const PORT_STATE_FILE: &str = "last_port.txt";

/// Errors that can occur during path resolution and directory creation.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the user's home directory.
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// Failed to create a directory.
    #[error("Failed to create {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },
}

/// All paths the tool touches, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Root for all blinkscope state (`~/.blinkscope` by default).
    pub data_root: PathBuf,
    /// Checkout of the companion debugger project.
    pub companion_dir: PathBuf,
    /// Plain-text record of the last successfully allocated port.
    pub port_state: PathBuf,
    /// `.env` file inside the companion checkout.
    pub env_file: PathBuf,
}

impl ResolvedPaths {
    /// Resolve from the environment: `BLINKSCOPE_DATA_DIR` wins,
    /// otherwise `.blinkscope` under the home directory.
    pub fn resolve() -> Result<Self, PathError> {
        if let Ok(root) = env::var(DATA_DIR_ENV) {
            return Ok(Self::from_root(PathBuf::from(root)));
        }
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        Ok(Self::from_root(home.join(".blinkscope")))
    }

    /// Pure layout under an explicit root. Adapters and tests use this
    /// to relocate the whole tree.
    pub fn from_root(data_root: PathBuf) -> Self {
        let companion_dir = data_root.join(COMPANION_DIR_NAME);
        let port_state = data_root.join(PORT_STATE_FILE);
        let env_file = companion_dir.join(".env");
        Self {
            data_root,
            companion_dir,
            port_state,
            env_file,
        }
    }

    /// Name/path pairs in display order.
    pub fn entries(&self) -> [(&'static str, &Path); 4] {
        [
            ("data_root", self.data_root.as_path()),
            ("companion_dir", self.companion_dir.as_path()),
            ("port_state", self.port_state.as_path()),
            ("env_file", self.env_file.as_path()),
        ]
    }
}

impl fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, path) in self.entries() {
            writeln!(f, "{name} = {}", path.display())?;
        }
        Ok(())
    }
}

/// Create a directory (and its parents) if it does not exist yet.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
