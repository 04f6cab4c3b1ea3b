// Application state module
// Everything a connection task needs, built once before the socket is bound

use hyper::header::HeaderValue;

use super::types::Config;
use crate::app;
use crate::error::ConfigError;
use crate::handler::static_files::StaticAssets;
use crate::routing::{CorsMiddleware, Dispatcher};
use crate::server::Shutdown;

/// Application state, shared read-only across connections
pub struct AppState {
    pub config: Config,
    pub router: CorsMiddleware,
    pub assets: Option<StaticAssets>,
    pub shutdown: Shutdown,
    /// Pre-validated `Server` header value
    pub server_header: Option<HeaderValue>,
}

impl AppState {
    /// Build the route table and static server; fails on any route conflict
    pub fn new(config: Config, shutdown: Shutdown) -> Result<Self, ConfigError> {
        let table = app::build_routes(&config, &shutdown)?;
        if table.is_empty() {
            tracing::warn!("route table is empty, every request will be 404");
        } else {
            tracing::info!(routes = table.len(), "route table built");
        }

        let assets = config.static_assets.enabled.then(|| {
            let assets = StaticAssets::from_config(&config.static_assets);
            tracing::info!(
                prefix = assets.prefix(),
                root = %config.static_assets.root,
                "serving static assets"
            );
            assets
        });

        let server_header = HeaderValue::from_str(&config.http.server_name)
            .map_err(|e| {
                tracing::warn!(
                    server_name = %config.http.server_name,
                    error = %e,
                    "invalid server name, Server header disabled"
                );
            })
            .ok();

        Ok(Self {
            router: CorsMiddleware::new(Dispatcher::new(table)),
            assets,
            shutdown,
            server_header,
            config,
        })
    }
}
