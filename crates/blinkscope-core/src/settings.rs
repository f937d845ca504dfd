//! Fixed names and defaults shared by all adapters.

/// First port tried when no previous allocation is recorded.
pub const DEFAULT_BASE_PORT: u16 = 3000;

/// Upper bound (inclusive) of the port scan.
pub const DEFAULT_MAX_PORT: u16 = 3010;

/// Environment flag set on the dev server so the companion project can
/// detect it is running under supervision and skip its own bootstrap.
pub const SUPERVISOR_ENV_FLAG: &str = "BLINKSCOPE_DEBUGGER_INSTANCE";

/// Git remote of the companion debugger project.
pub const COMPANION_REPO_URL: &str = "https://github.com/Open-Sorcerer/blinks-debugger";

/// Program used to install and run the companion project.
pub const DEFAULT_RUNNER: &str = "bun";

/// Default content of the companion project's `.env`.
pub const DEFAULT_ENV_CONTENT: &str = "NEXT_PUBLIC_RPC=https://api.mainnet-beta.solana.com\n";
