use std::process::ExitCode;
use std::sync::Arc;

mod app;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

use error::ServerError;
use server::{Shutdown, ShutdownReason};

fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());

    let cfg = match config::Config::load_from(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("[FATAL] {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logger::init(&cfg.logging) {
        eprintln!("[FATAL] failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    // Create Tokio runtime, worker count from config when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        tracing::info!(workers, "using configured worker threads");
    }

    let runtime = match runtime_builder.build() {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::error!(%error, "failed to build runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async_main(cfg));
    runtime.shutdown_timeout(std::time::Duration::from_secs(1));

    match result {
        Ok(reason) => {
            tracing::info!(?reason, "API is down");
            ExitCode::from(u8::try_from(reason.exit_code()).unwrap_or(1))
        }
        Err(error) => {
            tracing::error!(%error, "API is down");
            ExitCode::FAILURE
        }
    }
}

async fn async_main(cfg: config::Config) -> Result<ShutdownReason, ServerError> {
    let addr = cfg.socket_addr()?;
    let shutdown = Shutdown::new();
    let state = Arc::new(config::AppState::new(cfg, shutdown.clone())?);

    let listener =
        server::create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;
    tracing::info!(%addr, "API listening at {} port", addr.port());

    server::signal::start_signal_handler(shutdown)?;

    Ok(server::start_server_loop(listener, state).await)
}
