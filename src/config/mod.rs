// Configuration module entry point
// Loads startup configuration from an optional file and the environment

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ConfigError;

// Re-export public types
pub use state::AppState;
pub use types::{
    AppInfoConfig, Config, KubernetesConfig, LoggingConfig, StaticAssetsConfig, VaultConfig,
};

/// Default config file path (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `DEMO_API_SERVER__PORT=8080`
const ENV_PREFIX: &str = "DEMO_API";

impl Config {
    /// Load configuration from specified file path (without extension).
    /// The file is optional; missing keys fall back to built-in defaults.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "debug")?
            .set_default("logging.format", "full")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_grace_period", 10)?
            .set_default("http.server_name", "demo-api")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("static_assets.enabled", true)?
            .set_default("static_assets.prefix", "/swagger-ui/")?
            .set_default("static_assets.root", "third_party/swagger-ui")?
            .set_default("app.name", "demo-api")?
            .set_default("app.company", "demo")?
            .set_default("app.chart_version", "0.1.0")?
            .set_default("app.docker_tag", "latest")?
            .set_default("vault.secret_one", "vault-secret-one")?
            .set_default("vault.secret_two", "vault-secret-two")?
            .set_default("kubernetes.config_one", "configmap-value-one")?
            .set_default("kubernetes.config_two", "configmap-value-two")?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ConfigError::InvalidAddress { addr, source })
    }
}
