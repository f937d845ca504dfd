//! Core domain types and port definitions for blinkscope.
//!
//! This crate holds the pieces every adapter shares: semantic errors,
//! the dev-server event vocabulary, path resolution for the data
//! directory, and the trait interfaces the runtime implements. It has
//! no OS-level or adapter-specific dependencies.

pub mod events;
pub mod paths;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use events::DevServerEvent;
pub use paths::{PathError, ResolvedPaths, ensure_directory};
pub use ports::{AllocationRequest, LaunchConfig, PortError, PortGuard, ProcessError};
pub use settings::{
    COMPANION_REPO_URL, DEFAULT_BASE_PORT, DEFAULT_ENV_CONTENT, DEFAULT_MAX_PORT, DEFAULT_RUNNER,
    SUPERVISOR_ENV_FLAG,
};
