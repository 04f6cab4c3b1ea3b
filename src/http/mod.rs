//! HTTP protocol layer module
//!
//! Response builders and MIME detection, decoupled from routing and handlers.

pub mod mime;
pub mod response;

// Re-export commonly used items
pub use response::{
    build_301_response, build_400_response, build_403_response, build_404_response,
    build_405_response, build_413_response, build_500_response, build_file_response,
    build_json_response, build_preflight_response, HttpResponse,
};
