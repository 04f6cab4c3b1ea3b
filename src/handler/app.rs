//! Application endpoints: liveness, info, performance placeholder and kill switch

use chrono::{DateTime, Utc};
use hyper::StatusCode;
use serde::Serialize;

use super::{Handler, HandlerFuture, Request};
use crate::config::AppInfoConfig;
use crate::http::build_json_response;
use crate::server::{Shutdown, ShutdownReason};

#[derive(Debug, Serialize)]
struct Status {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct Message {
    message: &'static str,
}

/// `GET /healthz`
pub struct HealthHandler;

impl Handler for HealthHandler {
    fn call(&self, _req: Request) -> HandlerFuture {
        Box::pin(async { build_json_response(StatusCode::OK, &Status { status: "ok" }) })
    }
}

#[derive(Debug, Serialize)]
struct AppInfo {
    app_name: String,
    company: String,
    chart_version: String,
    docker_tag: String,
    started_at: String,
    uptime_seconds: i64,
}

/// `GET /app`
pub struct InfoHandler {
    info: AppInfoConfig,
    started_at: DateTime<Utc>,
}

impl InfoHandler {
    pub fn new(info: AppInfoConfig) -> Self {
        Self {
            info,
            started_at: Utc::now(),
        }
    }
}

impl Handler for InfoHandler {
    fn call(&self, _req: Request) -> HandlerFuture {
        let body = AppInfo {
            app_name: self.info.name.clone(),
            company: self.info.company.clone(),
            chart_version: self.info.chart_version.clone(),
            docker_tag: self.info.docker_tag.clone(),
            started_at: self.started_at.to_rfc3339(),
            uptime_seconds: (Utc::now() - self.started_at).num_seconds(),
        };
        Box::pin(async move { build_json_response(StatusCode::OK, &body) })
    }
}

#[derive(Debug, Serialize)]
struct PerformanceResult {
    message: &'static str,
    received_bytes: usize,
}

/// `POST /app/performance`
///
/// Placeholder for a load-generation action; it only acknowledges the request.
pub struct PerformanceHandler;

impl Handler for PerformanceHandler {
    fn call(&self, req: Request) -> HandlerFuture {
        let received_bytes = req.body().len();
        tracing::info!(received_bytes, "performance action requested");
        Box::pin(async move {
            build_json_response(
                StatusCode::OK,
                &PerformanceResult {
                    message: "performance test placeholder",
                    received_bytes,
                },
            )
        })
    }
}

/// `POST /app/kill`
///
/// Answers, then asks the server to stop; the process exits with code 1.
pub struct KillHandler {
    shutdown: Shutdown,
}

impl KillHandler {
    pub const fn new(shutdown: Shutdown) -> Self {
        Self { shutdown }
    }
}

impl Handler for KillHandler {
    fn call(&self, _req: Request) -> HandlerFuture {
        if self.shutdown.trigger(ShutdownReason::Kill) {
            tracing::warn!("kill requested, server is going down");
        }
        Box::pin(async {
            build_json_response(
                StatusCode::OK,
                &Message {
                    message: "app is shutting down",
                },
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::body::Bytes;

    fn request(body: &'static str) -> Request {
        hyper::Request::builder()
            .uri("/app")
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap()
    }

    async fn json_of(handler: &dyn Handler, req: Request) -> serde_json::Value {
        let resp = handler.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let value = json_of(&HealthHandler, request("")).await;
        assert_eq!(value, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_info_reports_config() {
        let handler = InfoHandler::new(AppInfoConfig {
            name: "demo-api".to_string(),
            company: "acme".to_string(),
            chart_version: "1.2.3".to_string(),
            docker_tag: "abc123".to_string(),
        });
        let value = json_of(&handler, request("")).await;
        assert_eq!(value["app_name"], "demo-api");
        assert_eq!(value["company"], "acme");
        assert_eq!(value["chart_version"], "1.2.3");
        assert_eq!(value["docker_tag"], "abc123");
        assert!(value["uptime_seconds"].as_i64().unwrap() >= 0);
    }

    #[tokio::test]
    async fn test_performance_acknowledges_body() {
        let value = json_of(&PerformanceHandler, request("{\"runs\":3}")).await;
        assert_eq!(value["received_bytes"], 10);
    }

    #[tokio::test]
    async fn test_kill_triggers_shutdown() {
        let shutdown = Shutdown::new();
        let handler = KillHandler::new(shutdown.clone());
        let value = json_of(&handler, request("")).await;
        assert_eq!(value["message"], "app is shutting down");
        assert_eq!(shutdown.reason(), Some(ShutdownReason::Kill));

        // a second kill still answers
        json_of(&handler, request("")).await;
    }
}
