//! Default environment file for the companion project.

use std::fs;
use std::path::Path;

use tracing::warn;

use blinkscope_core::settings::DEFAULT_ENV_CONTENT;

/// Write the default `.env` into the companion checkout.
///
/// Overwritten on every run so the debugger always starts from a known
/// RPC endpoint. Failure is not fatal: the dev server can still start
/// with whatever configuration is already there.
pub fn write_defaults(path: &Path) {
    match fs::write(path, DEFAULT_ENV_CONTENT) {
        Ok(()) => println!("Created .env file with default Solana RPC URL"),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to write .env defaults");
            eprintln!("Failed to create .env file; continuing with existing configuration.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_the_default_rpc_line() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env");
        write_defaults(&path);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "NEXT_PUBLIC_RPC=https://api.mainnet-beta.solana.com\n");
    }

    #[test]
    fn overwrites_an_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env");
        fs::write(&path, "NEXT_PUBLIC_RPC=http://localhost:8899\n").unwrap();
        write_defaults(&path);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("api.mainnet-beta.solana.com"));
    }
}
