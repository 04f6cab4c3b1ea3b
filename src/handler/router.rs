//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body buffering, static prefix
//! check, CORS-wrapped dispatch, `Server` header and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, CONTENT_LENGTH, REFERER, SERVER, USER_AGENT};
use hyper::Version;

use super::Request;
use crate::config::AppState;
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: hyper::Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<HttpResponse, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let access_log = state.config.logging.access_log;
    let mut entry = access_log.then(|| access_entry(&req, peer_addr));

    let mut resp = match read_body(req, state.config.http.max_body_size).await {
        Ok(req) => route(req, &state).await,
        Err(resp) => resp,
    };

    if let Some(server) = &state.server_header {
        resp.headers_mut().insert(SERVER, server.clone());
    }

    if let Some(entry) = entry.as_mut() {
        entry.status = resp.status().as_u16();
        entry.body_bytes = resp
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(resp)
}

/// Route a buffered request: static prefix first, then the route table
pub async fn route(req: Request, state: &AppState) -> HttpResponse {
    if let Some(assets) = &state.assets {
        if assets.strip_prefix(req.uri().path()).is_some() {
            return assets.serve(&req).await;
        }
    }
    state.router.handle(req).await
}

/// Buffer the request body, enforcing `max_body_size`
async fn read_body<B>(req: hyper::Request<B>, max_body_size: u64) -> Result<Request, HttpResponse>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    if let Some(resp) = check_body_size(&req, max_body_size) {
        return Err(resp);
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let (parts, body) = req.into_parts();
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(Request::from_parts(parts, collected.to_bytes())),
        Err(e) if e.is::<LengthLimitError>() => {
            tracing::warn!(max_body_size, "request body exceeded limit while streaming");
            Err(http::build_413_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to read request body");
            Err(http::build_400_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &hyper::Request<B>, max_body_size: u64) -> Option<HttpResponse> {
    let content_length = req.headers().get(CONTENT_LENGTH)?;
    let Ok(size_str) = content_length.to_str() else {
        tracing::warn!("Content-Length header contains non-ASCII characters");
        return None;
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            tracing::warn!(size, max_body_size, "request body too large");
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            tracing::warn!(value = size_str, "invalid Content-Length value, skipping size check");
            None
        }
    }
}

fn access_entry<B>(req: &hyper::Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}
