//! Edge request URI rewriting
//!
//! Appends `index.html` to directory-like request URIs delivered by an
//! edge-compute platform, leaving every other request field untouched.

pub mod config;
pub mod event;
pub mod handler;
pub mod http;
pub mod logger;
pub mod rewrite;
pub mod server;

pub use event::{CloudFrontEvent, CloudFrontRequest, EventError};
pub use handler::{handle_event, rewrite_request, Invocation};
pub use rewrite::{normalize, DEFAULT_DOCUMENT};
