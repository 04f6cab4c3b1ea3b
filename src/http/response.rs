//! HTTP response building module
//!
//! Builders for the status responses produced by the dispatch layer itself
//! (as opposed to handlers).

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_METHODS, ALLOW, CONTENT_LENGTH, CONTENT_TYPE, LOCATION,
};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::error::HandlerError;

/// Response type shared by every handler and builder
pub type HttpResponse = Response<Full<Bytes>>;

const INTERNAL_ERROR_BODY: &str = r#"{"error":"Internal Server Error"}"#;

/// Build a plain text response with the given status
fn build_text_response(status: StatusCode, body: &'static str) -> HttpResponse {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::from_static(body.as_bytes())))
        })
}

/// Build 301 redirect response
pub fn build_301_response(location: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(b"301 Moved Permanently")))
        .unwrap_or_else(|e| {
            log_build_error(StatusCode::MOVED_PERMANENTLY, &e);
            build_404_response()
        })
}

/// Build 400 Bad Request response
pub fn build_400_response() -> HttpResponse {
    build_text_response(StatusCode::BAD_REQUEST, "400 Bad Request")
}

/// Build 403 Forbidden response
pub fn build_403_response() -> HttpResponse {
    build_text_response(StatusCode::FORBIDDEN, "403 Forbidden")
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response with an `Allow` header
pub fn build_405_response(allow: &str) -> HttpResponse {
    let mut resp = build_text_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    match HeaderValue::from_str(allow) {
        Ok(value) => {
            resp.headers_mut().insert(ALLOW, value);
        }
        Err(e) => tracing::error!(allow, error = %e, "invalid Allow header value"),
    }
    resp
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> HttpResponse {
    build_text_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
}

/// Build 500 response with a generic body; details stay in the server log
pub fn build_500_response() -> HttpResponse {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(INTERNAL_ERROR_BODY.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(StatusCode::INTERNAL_SERVER_ERROR, &e);
            Response::new(Full::new(Bytes::from_static(INTERNAL_ERROR_BODY.as_bytes())))
        })
}

/// Build CORS preflight response (200, empty body)
pub fn build_preflight_response(allow_methods: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header(ACCESS_CONTROL_ALLOW_METHODS, allow_methods)
        .header(CONTENT_LENGTH, 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(StatusCode::OK, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build JSON response
pub fn build_json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<HttpResponse, HandlerError> {
    let json = serde_json::to_vec(body)?;
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(json)))?)
}

/// Build 200 response for a static file; `HEAD` keeps headers, drops the body
pub fn build_file_response(data: Bytes, content_type: &str, is_head: bool) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(StatusCode::OK, &e);
            build_500_response()
        })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    tracing::error!(%status, %error, "failed to build response");
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_405_carries_allow() {
        let resp = build_405_response("GET, OPTIONS");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "GET, OPTIONS");
    }

    #[test]
    fn test_301_carries_location() {
        let resp = build_301_response("/swagger-ui/?x=1");
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/swagger-ui/?x=1");
    }

    #[tokio::test]
    async fn test_500_body_is_generic() {
        let resp = build_500_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, INTERNAL_ERROR_BODY.as_bytes());
    }

    #[test]
    fn test_head_file_response_has_length_but_no_body() {
        let resp = build_file_response(Bytes::from_static(b"hello"), "text/plain", true);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "5");
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain");
    }

    #[tokio::test]
    async fn test_json_response() {
        let resp =
            build_json_response(StatusCode::OK, &serde_json::json!({"status": "ok"})).unwrap();
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, br#"{"status":"ok"}"#.as_slice());
    }
}
