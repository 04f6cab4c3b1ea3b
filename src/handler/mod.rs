//! Request handler module
//!
//! Every endpoint is a [`Handler`]: one method turning a buffered request into
//! a response. The dispatch layer only ever sees `Arc<dyn Handler>`.

pub mod app;
pub mod kubernetes;
pub mod router;
pub mod static_files;
pub mod vault;

use std::future::Future;
use std::pin::Pin;

use hyper::body::Bytes;

use crate::error::HandlerError;
use crate::http::HttpResponse;

// Re-export main entry point
pub use router::handle_request;

/// Request with its body fully read
pub type Request = hyper::Request<Bytes>;

/// Boxed future returned by [`Handler::call`]
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<HttpResponse, HandlerError>> + Send>>;

/// A single endpoint
pub trait Handler: Send + Sync {
    fn call(&self, req: Request) -> HandlerFuture;
}

/// Adapter turning an async closure into a [`Handler`]
#[cfg(test)]
pub struct FnHandler<F>(F);

/// Wrap an async function as a handler
#[cfg(test)]
pub const fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HttpResponse, HandlerError>> + Send + 'static,
{
    FnHandler(f)
}

#[cfg(test)]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HttpResponse, HandlerError>> + Send + 'static,
{
    fn call(&self, req: Request) -> HandlerFuture {
        Box::pin((self.0)(req))
    }
}
