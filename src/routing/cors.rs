//! CORS method middleware
//!
//! Wraps the [`Dispatcher`]. For a registered path, `OPTIONS` is answered
//! directly with the path's methods, and every other response gets the same
//! `Access-Control-Allow-Methods` header. Unregistered paths pass through.

use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_METHODS};
use hyper::Method;

use super::dispatcher::Dispatcher;
use crate::handler::Request;
use crate::http::{self, HttpResponse};

pub struct CorsMiddleware {
    inner: Dispatcher,
}

impl CorsMiddleware {
    pub const fn new(inner: Dispatcher) -> Self {
        Self { inner }
    }

    pub async fn handle(&self, req: Request) -> HttpResponse {
        let Some(route) = self.inner.table().lookup(req.uri().path()) else {
            return self.inner.dispatch(req).await;
        };
        let allow_methods = route.cors_allow_methods();

        if req.method() == Method::OPTIONS {
            return http::build_preflight_response(&allow_methods);
        }

        let mut resp = self.inner.dispatch(req).await;
        match HeaderValue::from_str(&allow_methods) {
            Ok(value) => {
                resp.headers_mut().insert(ACCESS_CONTROL_ALLOW_METHODS, value);
            }
            Err(e) => tracing::error!(allow_methods = %allow_methods, error = %e, "invalid allow-methods value"),
        }
        resp
    }
}
