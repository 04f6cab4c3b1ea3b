//! `GET /vault`: mocked secret lookup
//!
//! No secrets store is contacted; the values come from configuration.

use hyper::StatusCode;

use super::{Handler, HandlerFuture, Request};
use crate::config::VaultConfig;
use crate::http::build_json_response;

pub struct VaultHandler {
    secrets: VaultConfig,
}

impl VaultHandler {
    pub const fn new(secrets: VaultConfig) -> Self {
        Self { secrets }
    }
}

impl Handler for VaultHandler {
    fn call(&self, _req: Request) -> HandlerFuture {
        let secrets = self.secrets.clone();
        Box::pin(async move { build_json_response(StatusCode::OK, &secrets) })
    }
}
