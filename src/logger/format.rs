//! Invocation log format module
//!
//! Supports two formats:
//! - `text` (single line, nginx-like)
//! - `json` (structured, one object per line)

use chrono::Local;
use serde::Serialize;

use crate::config::LogFormat;
use crate::handler::Invocation;

/// One log line per handled invocation
#[derive(Debug, Clone, Serialize)]
pub struct InvocationLogEntry {
    /// Invoker address, when served over HTTP
    pub remote_addr: Option<String>,
    /// Invocation timestamp
    pub time: chrono::DateTime<Local>,
    /// Client IP reported inside the event
    pub client_ip: Option<String>,
    /// HTTP method reported inside the event
    pub method: Option<String>,
    pub original_uri: String,
    pub uri: String,
    pub rewritten: bool,
    /// Processing time in microseconds
    pub duration_us: u64,
}

impl InvocationLogEntry {
    /// Create a new entry with current timestamp
    pub fn new(invocation: &Invocation) -> Self {
        Self {
            remote_addr: None,
            time: Local::now(),
            client_ip: invocation.request.client_ip().map(ToString::to_string),
            method: invocation.request.method().map(ToString::to_string),
            original_uri: invocation.original_uri.clone(),
            uri: invocation.request.uri().to_string(),
            rewritten: invocation.rewritten(),
            duration_us: 0,
        }
    }

    pub fn format(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Text => self.format_text(),
            LogFormat::Json => self.format_json(),
        }
    }

    /// `[$time] $remote_addr $client_ip "$method $original_uri" -> $uri ($duration)`
    fn format_text(&self) -> String {
        #[allow(clippy::cast_precision_loss)]
        let duration_ms = self.duration_us as f64 / 1_000.0;
        format!(
            "[{}] {} {} \"{} {}\" -> {} {} {duration_ms:.3}ms",
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.remote_addr.as_deref().unwrap_or("-"),
            self.client_ip.as_deref().unwrap_or("-"),
            self.method.as_deref().unwrap_or("-"),
            self.original_uri,
            self.uri,
            if self.rewritten { "rewritten" } else { "unchanged" },
        )
    }

    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"log_error":"{e}"}}"#))
    }
}
