//! Port allocation: evict-then-probe with a persisted preference.

use std::path::PathBuf;

use tracing::{debug, warn};

use blinkscope_core::ports::{AllocationRequest, PortError, PortGuard};

use super::guard::evict;
use super::probe::probe;
use super::state::{read_last_port, write_last_port};

/// Finds one usable port for the dev server.
///
/// The port used on the previous run is tried first so the debug URL
/// stays stable across restarts; only then is the configured range
/// scanned in ascending order. Each candidate is evicted and probed
/// fully before the next one is considered.
pub struct PortAllocator<G> {
    guard: G,
    state_path: PathBuf,
    range_start: u16,
    range_end: u16,
}

impl<G: PortGuard> PortAllocator<G> {
    /// Create an allocator scanning `range_start..=range_end`, with its
    /// state persisted at `state_path`.
    pub fn new(
        guard: G,
        state_path: impl Into<PathBuf>,
        range_start: u16,
        range_end: u16,
    ) -> Self {
        Self {
            guard,
            state_path: state_path.into(),
            range_start,
            range_end,
        }
    }

    /// Build this run's request from the persisted state. A missing or
    /// unreadable record falls back to the start of the range.
    pub fn request(&self) -> AllocationRequest {
        let preferred = read_last_port(&self.state_path).unwrap_or(self.range_start);
        AllocationRequest::new(preferred, self.range_start, self.range_end)
    }

    /// Allocate one usable port and persist it for the next run.
    ///
    /// Fails only when every port in the range is occupied by a
    /// process the guard cannot remove.
    pub async fn allocate(&self) -> Result<u16, PortError> {
        let request = self.request();

        if self.try_port(request.preferred_port).await {
            self.persist(request.preferred_port);
            return Ok(request.preferred_port);
        }

        for port in request.range_start..=request.range_end {
            if port == request.preferred_port {
                continue;
            }
            if self.try_port(port).await {
                self.persist(port);
                return Ok(port);
            }
        }

        Err(PortError::NoPortAvailable {
            start: request.range_start,
            end: request.range_end,
        })
    }

    async fn try_port(&self, port: u16) -> bool {
        evict(&self.guard, port).await;
        let free = probe(port).await;
        if !free {
            debug!(port = %port, "Port unavailable, moving on");
        }
        free
    }

    fn persist(&self, port: u16) {
        match write_last_port(&self.state_path, port) {
            Ok(()) => debug!(port = %port, "Recorded allocated port"),
            Err(e) => {
                // The allocation itself is still good
                warn!(path = %self.state_path.display(), error = %e, "Failed to persist allocated port");
            }
        }
    }
}
