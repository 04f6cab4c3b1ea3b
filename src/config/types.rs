// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub static_assets: StaticAssetsConfig,
    pub app: AppInfoConfig,
    pub vault: VaultConfig,
    pub kubernetes: KubernetesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Output format: `full`, `compact` or `json`
    pub format: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    pub access_log_format: String,
}

/// Performance configuration (seconds)
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub shutdown_grace_period: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

/// Static documentation bundle served under a path prefix
#[derive(Debug, Deserialize, Clone)]
pub struct StaticAssetsConfig {
    pub enabled: bool,
    pub prefix: String,
    pub root: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string()]
}

/// Values reported by `GET /app`
#[derive(Debug, Deserialize, Clone)]
pub struct AppInfoConfig {
    pub name: String,
    pub company: String,
    pub chart_version: String,
    pub docker_tag: String,
}

/// Mock secrets returned by `GET /vault`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VaultConfig {
    pub secret_one: String,
    pub secret_two: String,
}

/// Mock config-map data returned by `GET /kubernetes`
#[derive(Debug, Deserialize, Clone)]
pub struct KubernetesConfig {
    pub config_one: String,
    pub config_two: String,
}
