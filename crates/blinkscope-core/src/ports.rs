//! Port definitions (trait interfaces) and semantic errors.
//!
//! These express intent, not mechanism: the runtime crate supplies the
//! OS-backed implementations, and tests supply fakes.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::settings::{DEFAULT_RUNNER, SUPERVISOR_ENV_FLAG};

/// Bounds for one port-allocation pass, built once per run from the
/// persisted state and the static scan range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationRequest {
    /// Port used on the previous run, tried before anything else so
    /// the debug URL stays stable across restarts.
    pub preferred_port: u16,
    /// First port of the fallback scan.
    pub range_start: u16,
    /// Last port of the fallback scan (inclusive).
    pub range_end: u16,
}

impl AllocationRequest {
    pub const fn new(preferred_port: u16, range_start: u16, range_end: u16) -> Self {
        Self {
            preferred_port,
            range_start,
            range_end,
        }
    }
}

/// Intent-based configuration for launching the companion dev server.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Root of the companion project checkout.
    pub project_dir: PathBuf,
    /// Program running the dev script.
    pub runner: String,
    /// Environment flag set on the child so it can detect supervision.
    pub signature_env: String,
    /// Optional URL to open in the debugger once it is serving,
    /// appended to the ready URL as a `url` query parameter.
    pub target_url: Option<String>,
}

impl LaunchConfig {
    /// Create a launch configuration with the default runner and
    /// signature flag.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            runner: DEFAULT_RUNNER.to_string(),
            signature_env: SUPERVISOR_ENV_FLAG.to_string(),
            target_url: None,
        }
    }

    /// Override the runner program.
    #[must_use]
    pub fn with_runner(mut self, runner: impl Into<String>) -> Self {
        self.runner = runner.into();
        self
    }

    /// Set the target URL to append to the ready URL.
    #[must_use]
    pub fn with_target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = Some(url.into());
        self
    }
}

/// Capability interface for finding and terminating whatever process
/// currently holds a TCP port.
///
/// The allocator and the lifecycle teardown depend only on this trait;
/// the platform-specific command parsing lives behind it.
#[async_trait]
pub trait PortGuard: Send + Sync {
    /// PID of the process listening on `port`, if one can be found.
    async fn find_process_on_port(&self, port: u16) -> Option<u32>;

    /// Forcefully terminate `pid`. A process that is already gone is
    /// not an error.
    async fn kill(&self, pid: u32) -> io::Result<()>;
}

/// Port allocation failure.
#[derive(Debug, Error)]
pub enum PortError {
    /// Every port in the scan range was occupied and un-evictable.
    #[error("No available ports in range {start}-{end}")]
    NoPortAvailable { start: u16, end: u16 },
}

/// Dev-server process failure.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The dev-server command could not be started.
    #[error("Failed to start dev server: {0}")]
    SpawnFailed(String),

    /// Tearing the dev server down failed.
    #[error("Failed to stop dev server: {0}")]
    StopFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_config_defaults() {
        let config = LaunchConfig::new("/tmp/project");
        assert_eq!(config.runner, "bun");
        assert_eq!(config.signature_env, "BLINKSCOPE_DEBUGGER_INSTANCE");
        assert!(config.target_url.is_none());
    }

    #[test]
    fn launch_config_builders() {
        let config = LaunchConfig::new("/tmp/project")
            .with_runner("npm")
            .with_target_url("https://example.com/x");
        assert_eq!(config.runner, "npm");
        assert_eq!(config.target_url.as_deref(), Some("https://example.com/x"));
    }

    #[test]
    fn no_port_available_message_names_the_range() {
        let err = PortError::NoPortAvailable {
            start: 3000,
            end: 3010,
        };
        assert_eq!(err.to_string(), "No available ports in range 3000-3010");
    }
}
