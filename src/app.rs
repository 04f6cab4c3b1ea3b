//! Route registration for the demo API

use std::sync::Arc;

use hyper::Method;

use crate::config::Config;
use crate::error::ConfigError;
use crate::handler::app::{HealthHandler, InfoHandler, KillHandler, PerformanceHandler};
use crate::handler::kubernetes::KubernetesHandler;
use crate::handler::vault::VaultHandler;
use crate::routing::RouteTable;
use crate::server::Shutdown;

/// Build the route table; any duplicate registration aborts startup
pub fn build_routes(config: &Config, shutdown: &Shutdown) -> Result<RouteTable, ConfigError> {
    let get = [Method::GET, Method::OPTIONS];
    let post = [Method::POST, Method::OPTIONS];

    let mut table = RouteTable::new();
    table.register("/healthz", &get, Arc::new(HealthHandler))?;
    table.register(
        "/vault",
        &get,
        Arc::new(VaultHandler::new(config.vault.clone())),
    )?;
    table.register(
        "/kubernetes",
        &get,
        Arc::new(KubernetesHandler::new(config.kubernetes.clone())),
    )?;

    table.register("/app", &get, Arc::new(InfoHandler::new(config.app.clone())))?;
    table.register("/app/performance", &post, Arc::new(PerformanceHandler))?;
    table.register(
        "/app/kill",
        &post,
        Arc::new(KillHandler::new(shutdown.clone())),
    )?;

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppState;
    use crate::handler::router::route;
    use crate::handler::Request;
    use crate::server::ShutdownReason;
    use http_body_util::BodyExt;
    use hyper::body::Bytes;
    use hyper::header::{ACCESS_CONTROL_ALLOW_METHODS, ALLOW};
    use hyper::StatusCode;

    fn request(method: Method, path: &str) -> Request {
        hyper::Request::builder()
            .method(method)
            .uri(path)
            .body(Bytes::new())
            .unwrap()
    }

    fn state_with_docs(root: &std::path::Path) -> AppState {
        let mut config = Config::load_from("does/not/exist/config").unwrap();
        config.static_assets.root = root.to_string_lossy().into_owned();
        AppState::new(config, Shutdown::new()).unwrap()
    }

    #[test]
    fn test_all_routes_register() {
        let config = Config::load_from("does/not/exist/config").unwrap();
        let table = build_routes(&config, &Shutdown::new()).unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(table.lookup("/app/kill").unwrap().allow_header(), "POST, OPTIONS");
    }

    #[tokio::test]
    async fn test_every_route_answers_its_own_methods() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_docs(dir.path());

        for (method, path) in [
            (Method::GET, "/healthz"),
            (Method::GET, "/app"),
            (Method::GET, "/vault"),
            (Method::GET, "/kubernetes"),
            (Method::POST, "/app/performance"),
        ] {
            let resp = route(request(method.clone(), path), &state).await;
            assert_eq!(resp.status(), StatusCode::OK, "{method} {path}");

            let preflight = route(request(Method::OPTIONS, path), &state).await;
            assert_eq!(preflight.status(), StatusCode::OK);
            assert_eq!(
                preflight.headers()[ACCESS_CONTROL_ALLOW_METHODS],
                method.as_str()
            );
        }
    }

    #[tokio::test]
    async fn test_wrong_method_and_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_docs(dir.path());

        let resp = route(request(Method::GET, "/app/kill"), &state).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "POST, OPTIONS");
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_METHODS], "POST");

        let resp = route(request(Method::GET, "/missing"), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.shutdown.reason(), None);
    }

    #[tokio::test]
    async fn test_trailing_slash_dispatches_identically() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_docs(dir.path());

        let a = route(request(Method::GET, "/kubernetes"), &state).await;
        let b = route(request(Method::GET, "/kubernetes/"), &state).await;
        assert_eq!(a.status(), b.status());
        let a = a.into_body().collect().await.unwrap().to_bytes();
        let b = b.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_static_prefix_is_served_outside_route_table() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "swagger").unwrap();
        let state = state_with_docs(dir.path());

        let resp = route(request(Method::GET, "/swagger-ui/index.html"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, "swagger");

        let resp = route(request(Method::GET, "/swagger-ui/absent.html"), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get(ACCESS_CONTROL_ALLOW_METHODS).is_none());
    }

    #[tokio::test]
    async fn test_kill_route_requests_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_docs(dir.path());

        let resp = route(request(Method::POST, "/app/kill"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.shutdown.reason(), Some(ShutdownReason::Kill));
    }
}
