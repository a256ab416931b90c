// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

use crate::rewrite::DEFAULT_DOCUMENT;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub rewrite: RewriteConfig,
}

/// Invoke server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Log one line per invocation
    pub access_log: bool,
    /// Invocation log format (text or json)
    #[serde(default)]
    pub format: LogFormat,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Performance configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PerformanceConfig {
    /// Zero disables keep-alive; any other value enables it
    pub keep_alive_timeout: u64,
    /// Seconds to wait for each request head, including idle keep-alive time
    pub read_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    /// Largest accepted event payload in bytes
    pub max_body_size: u64,
}

/// URI rewrite configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    #[serde(default = "default_document")]
    pub default_document: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_document() -> String {
    DEFAULT_DOCUMENT.to_string()
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            default_document: default_document(),
        }
    }
}
