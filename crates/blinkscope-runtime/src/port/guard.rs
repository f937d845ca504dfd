//! Platform-specific lookup and termination of whatever holds a port.
//!
//! POSIX systems are asked via `lsof`; Windows via `netstat`, with
//! `taskkill` for the actual termination. Callers never see these
//! details: they go through the [`PortGuard`] trait.

use std::io;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use blinkscope_core::ports::PortGuard;

/// `PortGuard` backed by the host operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPortGuard;

impl SystemPortGuard {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PortGuard for SystemPortGuard {
    async fn find_process_on_port(&self, port: u16) -> Option<u32> {
        #[cfg(unix)]
        {
            find_unix(port).await
        }
        #[cfg(not(unix))]
        {
            find_windows(port).await
        }
    }

    async fn kill(&self, pid: u32) -> io::Result<()> {
        #[cfg(unix)]
        {
            kill_unix(pid)
        }
        #[cfg(not(unix))]
        {
            kill_windows(pid).await
        }
    }
}

/// Best-effort eviction of whatever currently holds `port`.
///
/// Every failure is swallowed: absence of a listener is the success
/// case, and a kill that does not stick is handled by the probe that
/// follows it.
pub async fn evict(guard: &dyn PortGuard, port: u16) {
    let Some(pid) = guard.find_process_on_port(port).await else {
        return;
    };
    debug!(port = %port, pid = %pid, "Evicting process holding port");
    if let Err(e) = guard.kill(pid).await {
        debug!(port = %port, pid = %pid, error = %e, "Eviction failed, continuing");
    }
}

#[cfg(unix)]
async fn find_unix(port: u16) -> Option<u32> {
    let output = Command::new("lsof")
        .args(["-ti", &format!("tcp:{port}"), "-sTCP:LISTEN"])
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_lsof_pids(&String::from_utf8_lossy(&output.stdout))
}

#[cfg(unix)]
fn kill_unix(pid: u32) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    match signal::kill(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        Ok(()) => Ok(()),
        // Already gone: the port is free either way
        Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(io::Error::other(e)),
    }
}

#[cfg(not(unix))]
async fn find_windows(port: u16) -> Option<u32> {
    let output = Command::new("netstat")
        .args(["-ano", "-p", "tcp"])
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_netstat_pid(&String::from_utf8_lossy(&output.stdout), port)
}

#[cfg(not(unix))]
async fn kill_windows(pid: u32) -> io::Result<()> {
    let output = Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/F"])
        .output()
        .await?;
    if output.status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!(
            "taskkill exited with {:?}",
            output.status.code()
        )))
    }
}

/// `lsof -ti` prints one PID per line; the first listener is enough.
#[cfg_attr(not(unix), allow(dead_code))]
fn parse_lsof_pids(stdout: &str) -> Option<u32> {
    stdout.lines().find_map(|line| line.trim().parse().ok())
}

/// Scan `netstat -ano` output for a LISTENING socket on `port` and
/// pull the PID out of the last column.
#[cfg_attr(unix, allow(dead_code))]
fn parse_netstat_pid(stdout: &str, port: u16) -> Option<u32> {
    let suffix = format!(":{port}");
    stdout
        .lines()
        .filter(|line| line.contains("LISTENING"))
        .find(|line| {
            line.split_whitespace()
                .nth(1)
                .is_some_and(|addr| addr.ends_with(&suffix))
        })?
        .split_whitespace()
        .last()?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn lsof_output_yields_first_pid() {
        assert_eq!(parse_lsof_pids("4312\n5877\n"), Some(4312));
        assert_eq!(parse_lsof_pids("  90210\n"), Some(90210));
        assert_eq!(parse_lsof_pids(""), None);
        assert_eq!(parse_lsof_pids("no pids here\n"), None);
    }

    #[test]
    fn netstat_output_yields_listening_pid_for_port() {
        let output = "\
Active Connections\n\n\
  Proto  Local Address          Foreign Address        State           PID\n\
  TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       1092\n\
  TCP    127.0.0.1:3000         0.0.0.0:0              LISTENING       20412\n\
  TCP    127.0.0.1:3000         127.0.0.1:52013        ESTABLISHED     20412\n";
        assert_eq!(parse_netstat_pid(output, 3000), Some(20412));
        assert_eq!(parse_netstat_pid(output, 135), Some(1092));
        assert_eq!(parse_netstat_pid(output, 3001), None);
    }

    #[test]
    fn netstat_does_not_match_port_suffixes() {
        let output =
            "  TCP    127.0.0.1:13000        0.0.0.0:0              LISTENING       777\n";
        assert_eq!(parse_netstat_pid(output, 3000), None);
    }

    /// Guard fake that records kills and optionally refuses them.
    struct RecordingGuard {
        pid: Option<u32>,
        refuse: bool,
        kills: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl PortGuard for RecordingGuard {
        async fn find_process_on_port(&self, _port: u16) -> Option<u32> {
            self.pid
        }

        async fn kill(&self, pid: u32) -> io::Result<()> {
            self.kills.lock().unwrap().push(pid);
            if self.refuse {
                Err(io::Error::other("operation not permitted"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn evict_kills_the_found_pid() {
        let guard = RecordingGuard {
            pid: Some(4242),
            refuse: false,
            kills: Mutex::new(Vec::new()),
        };
        evict(&guard, 3000).await;
        assert_eq!(*guard.kills.lock().unwrap(), vec![4242]);
    }

    #[tokio::test]
    async fn evict_is_a_noop_without_a_listener() {
        let guard = RecordingGuard {
            pid: None,
            refuse: false,
            kills: Mutex::new(Vec::new()),
        };
        evict(&guard, 3000).await;
        assert!(guard.kills.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn evict_swallows_kill_failures() {
        let guard = RecordingGuard {
            pid: Some(4242),
            refuse: true,
            kills: Mutex::new(Vec::new()),
        };
        // Must not panic or propagate
        evict(&guard, 3000).await;
        assert_eq!(*guard.kills.lock().unwrap(), vec![4242]);
    }
}
