//! `GET /kubernetes`: mocked config-map read

use hyper::StatusCode;
use serde::Serialize;

use super::{Handler, HandlerFuture, Request};
use crate::config::KubernetesConfig;
use crate::http::build_json_response;

#[derive(Debug, Serialize)]
struct ConfigMapData {
    config_one: String,
    config_two: String,
}

pub struct KubernetesHandler {
    data: KubernetesConfig,
}

impl KubernetesHandler {
    pub const fn new(data: KubernetesConfig) -> Self {
        Self { data }
    }
}

impl Handler for KubernetesHandler {
    fn call(&self, _req: Request) -> HandlerFuture {
        let body = ConfigMapData {
            config_one: self.data.config_one.clone(),
            config_two: self.data.config_two.clone(),
        };
        Box::pin(async move { build_json_response(StatusCode::OK, &body) })
    }
}
