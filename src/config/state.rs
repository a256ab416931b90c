// Application state module
// Holds the loaded configuration and the live connection counter

use std::sync::atomic::AtomicUsize;

use super::types::Config;

/// Application state shared by all connections
pub struct AppState {
    pub config: Config,
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            active_connections: AtomicUsize::new(0),
        }
    }

    /// Document name appended to directory-like URIs
    pub fn default_document(&self) -> &str {
        &self.config.rewrite.default_document
    }
}
