//! HTTP protocol layer module
//!
//! Response builders for the invoke server, decoupled from the rewrite logic.

pub mod response;

// Re-export commonly used types
pub use response::{
    build_404_response, build_405_response, build_413_response, build_error_response,
    build_health_response, build_json_response,
};
