//! Request dispatch
//!
//! Matches method and path against the [`RouteTable`] and invokes the
//! mapped handler. No match yields 404, a path match with the wrong method
//! yields 405 plus `Allow`, and a failing handler yields a generic 500.

use super::table::RouteTable;
use crate::handler::Request;
use crate::http::{self, HttpResponse};

pub struct Dispatcher {
    table: RouteTable,
}

impl Dispatcher {
    pub const fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub const fn table(&self) -> &RouteTable {
        &self.table
    }

    pub async fn dispatch(&self, req: Request) -> HttpResponse {
        let Some(route) = self.table.lookup(req.uri().path()) else {
            tracing::debug!(path = req.uri().path(), "no route matched");
            return http::build_404_response();
        };

        let Some(handler) = route.handler_for(req.method()) else {
            tracing::debug!(
                method = %req.method(),
                path = req.uri().path(),
                "method not allowed"
            );
            return http::build_405_response(&route.allow_header());
        };

        let method = req.method().clone();
        let path = req.uri().path().to_string();
        match handler.call(req).await {
            Ok(resp) => resp,
            Err(error) => {
                tracing::error!(%method, path = %path, %error, "handler failed");
                http::build_500_response()
            }
        }
    }
}
