//! Dev-server supervision: spawn the companion project's development
//! server and watch its output for the ready announcement.

mod ready;
mod watch;

pub use ready::ReadyScanner;

use std::process::Stdio;

use tokio::process::{Child, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use blinkscope_core::events::DevServerEvent;
use blinkscope_core::ports::{LaunchConfig, ProcessError};

/// Handle to the supervised dev-server process.
///
/// There is at most one of these per run. The lifecycle loop borrows
/// it mutably for exit-watching and termination; nothing else touches
/// the child.
pub struct DevServerHandle {
    pub(crate) child: Child,
    pub(crate) events_tx: UnboundedSender<DevServerEvent>,
    /// Port the server was asked to bind.
    pub port: u16,
}

impl DevServerHandle {
    /// OS process id of the child, while it is still running.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }
}

/// Spawns and watches the companion dev server.
pub struct DevServerSupervisor {
    config: LaunchConfig,
}

impl DevServerSupervisor {
    pub fn new(config: LaunchConfig) -> Self {
        Self { config }
    }

    /// Start `<runner> run dev --port <port>` inside the project
    /// directory, with the supervision signature flag set in the
    /// child's environment.
    ///
    /// Returns as soon as the child is spawned; readiness arrives
    /// later on the event stream as [`DevServerEvent::Ready`], at most
    /// once. Output lines carrying an error marker are relayed as
    /// [`DevServerEvent::ErrorLine`]; stderr is suppressed entirely.
    pub fn launch(
        &self,
        port: u16,
    ) -> Result<(DevServerHandle, UnboundedReceiver<DevServerEvent>), ProcessError> {
        let mut cmd = Command::new(&self.config.runner);
        cmd.args(["run", "dev", "--port"])
            .arg(port.to_string())
            .current_dir(&self.config.project_dir)
            .env(&self.config.signature_env, "true")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = cmd
            .spawn()
            .map_err(|e| ProcessError::SpawnFailed(e.to_string()))?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            watch::spawn_output_watcher(
                stdout,
                port,
                ReadyScanner::new(self.config.target_url.clone()),
                events_tx.clone(),
            );
        }

        debug!(port = %port, runner = %self.config.runner, "Dev server spawned");
        Ok((
            DevServerHandle {
                child,
                events_tx,
                port,
            },
            events_rx,
        ))
    }
}
