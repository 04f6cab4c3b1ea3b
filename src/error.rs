//! Error types
//!
//! Startup errors are fatal; handler errors are turned into a generic 500
//! by the dispatch layer and only logged in full on the server side.

use thiserror::Error;

/// Configuration and route-table errors, raised before the socket is bound
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("duplicate route: {method} {path}")]
    DuplicateRoute { path: String, method: String },

    #[error("invalid route '{path}': {reason}")]
    InvalidRoute { path: String, reason: &'static str },

    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Failure inside a handler
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to build response: {0}")]
    Response(#[from] hyper::http::Error),
}

/// Process lifecycle errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
