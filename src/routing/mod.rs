//! Routing module
//!
//! - Route table keyed by normalized path, one handler per method
//! - Dispatcher producing handler responses, 404 or 405
//! - CORS middleware answering preflight requests from the table

mod cors;
mod dispatcher;
mod table;

pub use cors::CorsMiddleware;
pub use dispatcher::Dispatcher;
pub use table::RouteTable;
