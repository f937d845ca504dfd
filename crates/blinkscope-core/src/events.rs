//! Dev-server lifecycle events.
//!
//! The runtime emits these while the companion dev server runs; the
//! CLI consumes them and decides what the operator sees. They are the
//! only channel between output watching and presentation.

use serde::Serialize;

/// Events emitted by the dev-server supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DevServerEvent {
    /// The dev server announced its local address. Emitted at most
    /// once per run; later announcements are ignored.
    Ready {
        /// Serving URL, with the target appended as a query parameter
        /// when one was configured.
        url: String,
    },

    /// An output line carrying an error marker, relayed verbatim.
    /// Everything else from the child is demoted to debug logging.
    ErrorLine { line: String },

    /// The child exited with a non-zero status. `code` is `None` when
    /// the process was terminated by a signal. A clean exit produces
    /// no event.
    Exited { code: Option<i32> },
}
