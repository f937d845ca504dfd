//! Process runtime and OS-level concerns for blinkscope.
//!
//! Everything that touches the operating system lives here: probing
//! and evicting TCP ports, allocating one with a persisted preference,
//! spawning the companion dev server, watching its output for the
//! ready announcement, and tearing it down on interrupt.

pub mod lifecycle;
pub mod port;
pub mod server;

// Re-export the main entry points
pub use lifecycle::{run_until_shutdown, shutdown_child};
pub use port::{PortAllocator, SystemPortGuard, evict, probe};
pub use server::{DevServerHandle, DevServerSupervisor};
