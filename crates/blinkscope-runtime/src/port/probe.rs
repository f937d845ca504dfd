//! Availability check for a single TCP port.

use tokio::net::TcpListener;

/// Check whether `port` is free by binding a listener on localhost and
/// immediately dropping it. Every failure cause (in use, permission
/// denied) collapses to "not available". Single attempt, no retries.
pub async fn probe(port: u16) -> bool {
    match TcpListener::bind(("127.0.0.1", port)).await {
        Ok(listener) => listener.local_addr().is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn free_port() -> u16 {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn probe_is_idempotent_on_a_free_port() {
        let port = free_port().await;
        assert!(probe(port).await);
        // No lingering listener from the first probe
        assert!(probe(port).await);
    }

    #[tokio::test]
    async fn probe_reports_an_occupied_port() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(!probe(port).await);
        drop(listener);
    }
}
