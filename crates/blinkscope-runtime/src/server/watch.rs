//! Async stdout watcher for the supervised dev server.
//!
//! Dev tooling can emit non-UTF8 bytes; reading raw lines with lossy
//! decoding keeps the watcher alive on bad input. A marker is only
//! recognized within a single line, never reassembled across reads.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use blinkscope_core::events::DevServerEvent;

use super::ready::ReadyScanner;

/// Lines containing this (case-insensitive) are relayed verbatim.
const ERROR_MARKER: &str = "error";

pub(crate) fn spawn_output_watcher(
    stream: impl AsyncRead + Unpin + Send + 'static,
    port: u16,
    mut scanner: ReadyScanner,
    events: UnboundedSender<DevServerEvent>,
) {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    while buf.last() == Some(&b'\n') || buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                    let line = String::from_utf8_lossy(&buf);
                    handle_line(&line, port, &mut scanner, &events);
                }
                Err(e) => {
                    debug!(port = %port, error = %e, "Output watcher exiting on read error");
                    break;
                }
            }
        }

        debug!(port = %port, "Output watcher exiting");
    });
}

fn handle_line(
    line: &str,
    port: u16,
    scanner: &mut ReadyScanner,
    events: &UnboundedSender<DevServerEvent>,
) {
    if let Some(url) = scanner.scan(line) {
        let _ = events.send(DevServerEvent::Ready { url });
        return;
    }
    if line.to_lowercase().contains(ERROR_MARKER) {
        let _ = events.send(DevServerEvent::ErrorLine {
            line: line.to_string(),
        });
        return;
    }
    debug!(port = %port, "dev server: {}", line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    async fn collect_events(output: &'static [u8]) -> Vec<DevServerEvent> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_output_watcher(output, 3000, ReadyScanner::new(None), tx);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn relays_ready_once_and_error_lines() {
        let output: &[u8] = b"starting...\n\
            - Local:  http://localhost:3000\n\
            compiled successfully\n\
            Error: something broke\n\
            - Local:  http://localhost:3000\n";

        let events = collect_events(output).await;
        assert_eq!(
            events,
            vec![
                DevServerEvent::Ready {
                    url: "http://localhost:3000".to_string()
                },
                DevServerEvent::ErrorLine {
                    line: "Error: something broke".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn quiet_output_produces_no_events() {
        let events = collect_events(b"ready in 300ms\ncompiled\n").await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn crlf_lines_are_trimmed() {
        let events = collect_events(b"- Local:  http://localhost:3000\r\n").await;
        assert_eq!(
            events,
            vec![DevServerEvent::Ready {
                url: "http://localhost:3000".to_string()
            }]
        );
    }
}
