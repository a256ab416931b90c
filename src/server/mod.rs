// Server module entry point
// Local invoke endpoint: listener setup, accept loop, connection handling and dispatch

pub mod connection;
pub mod listener;
pub mod router;
pub mod signal;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

/// Function invocation path used by runtime emulators
pub const INVOKE_PATH: &str = "/2015-03-31/functions/function/invocations";

/// Liveness check path
pub const HEALTH_PATH: &str = "/healthz";

pub use listener::create_reusable_listener;
pub use server_loop::serve;
pub use signal::shutdown_signal;
