// Server loop module
// Accepts connections until shutdown is requested, then drains in-flight ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::Instant;

use super::connection::spawn_connection;
use super::shutdown::ShutdownReason;
use crate::config::AppState;

/// Back-off after a failed `accept` (e.g. out of file descriptors)
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop; returns why the server stopped
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) -> ShutdownReason {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = state.shutdown.clone();

    let reason = loop {
        tokio::select! {
            reason = shutdown.requested() => break reason,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer_addr)) => {
                    tracing::trace!(%peer_addr, "connection accepted");
                    spawn_connection(stream, peer_addr, Arc::clone(&state), &active_connections);
                }
                Err(error) => {
                    tracing::error!(%error, "failed to accept connection");
                    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                }
            }
        }
    };

    drop(listener);
    tracing::info!(
        ?reason,
        active = active_connections.load(Ordering::SeqCst),
        "stopped accepting connections, draining"
    );

    let grace = Duration::from_secs(state.config.performance.shutdown_grace_period);
    drain_connections(&active_connections, grace).await;
    reason
}

/// Wait for in-flight connections to finish, at most `grace`
async fn drain_connections(active: &AtomicUsize, grace: Duration) {
    let deadline = Instant::now() + grace;
    loop {
        let remaining = active.load(Ordering::SeqCst);
        if remaining == 0 {
            tracing::info!("all connections drained");
            return;
        }
        if Instant::now() >= deadline {
            tracing::warn!(remaining, "grace period elapsed, abandoning connections");
            return;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::{create_listener, Shutdown};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn start() -> (std::net::SocketAddr, Arc<AppState>, tokio::task::JoinHandle<ShutdownReason>) {
        let mut config = Config::load_from("does/not/exist/config").unwrap();
        config.static_assets.enabled = false;
        config.logging.access_log = false;
        config.performance.shutdown_grace_period = 2;
        let state = Arc::new(AppState::new(config, Shutdown::new()).unwrap());

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(start_server_loop(listener, Arc::clone(&state)));
        (addr, state, server)
    }

    async fn send(addr: std::net::SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_serves_over_tcp_and_stops_on_signal() {
        let (addr, state, server) = start().await;

        let resp = send(
            addr,
            "GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(resp.starts_with("HTTP/1.1 200 OK"), "{resp}");
        assert!(resp.contains(r#"{"status":"ok"}"#));

        state.shutdown.trigger(ShutdownReason::Signal);
        let reason = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reason, ShutdownReason::Signal);
    }

    #[tokio::test]
    async fn test_kill_answers_then_stops() {
        let (addr, _state, server) = start().await;

        let resp = send(
            addr,
            "POST /app/kill HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(resp.starts_with("HTTP/1.1 200 OK"), "{resp}");

        let reason = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reason.exit_code(), 1);
    }
}
