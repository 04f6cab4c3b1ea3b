// Signal handling module
//
// - SIGTERM: graceful shutdown
// - SIGINT:  graceful shutdown (Ctrl+C)

use super::shutdown::{Shutdown, ShutdownReason};

/// Start signal handlers (Unix)
///
/// Spawns a background task that turns the first SIGTERM/SIGINT into a
/// shutdown request.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Shutdown) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        tracing::info!(signal = name, "signal received, shutting down gracefully");
        shutdown.trigger(ShutdownReason::Signal);
    });
    Ok(())
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Shutdown) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            tracing::info!("Ctrl+C received, shutting down gracefully");
            shutdown.trigger(ShutdownReason::Signal);
        }
    });
    Ok(())
}
