// Connection handling module
// Serves one TCP connection per spawned task

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;

/// Decrements the active-connection counter when the task ends, even on panic
struct ConnectionGuard(Arc<AtomicUsize>);

impl ConnectionGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Handle a single connection in a spawned task.
///
/// The connection is given `max(read_timeout, write_timeout)` in total. On
/// shutdown the connection finishes its in-flight request and then closes.
pub fn spawn_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    active_connections: &Arc<AtomicUsize>,
) {
    let guard = ConnectionGuard::new(active_connections);
    let mut shutdown_rx = state.shutdown.subscribe();

    tokio::spawn(async move {
        let _guard = guard;
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let timeout =
            Duration::from_secs(std::cmp::max(performance.read_timeout, performance.write_timeout));

        let mut builder = http1::Builder::new();
        builder.keep_alive(performance.keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                handler::handle_request(req, Arc::clone(&service_state), peer_addr)
            }),
        );
        tokio::pin!(conn);

        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);
        let mut draining = state.shutdown.reason().is_some();
        if draining {
            conn.as_mut().graceful_shutdown();
        }

        loop {
            tokio::select! {
                result = conn.as_mut() => {
                    if let Err(error) = result {
                        tracing::debug!(%peer_addr, %error, "connection error");
                    }
                    break;
                }
                changed = shutdown_rx.changed(), if !draining => {
                    draining = true;
                    if changed.is_ok() {
                        conn.as_mut().graceful_shutdown();
                    }
                }
                () = &mut deadline => {
                    tracing::warn!(
                        %peer_addr,
                        timeout_secs = timeout.as_secs(),
                        "connection timed out"
                    );
                    break;
                }
            }
        }
    });
}
