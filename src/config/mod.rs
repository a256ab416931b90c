// Configuration module entry point
// Loads layered configuration (file, environment, defaults) and holds runtime state

mod state;
mod types;

use std::net::SocketAddr;

use config::builder::DefaultState;
use config::ConfigBuilder;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LogFormat, LoggingConfig, PerformanceConfig, RewriteConfig, ServerConfig,
};

/// Environment variable naming an alternative config file (without extension)
pub const CONFIG_PATH_ENV: &str = "EDGE_REWRITE_CONFIG";

/// Prefix for environment overrides, e.g. `EDGE_REWRITE_SERVER__PORT=9100`
const ENV_PREFIX: &str = "EDGE_REWRITE";

impl Config {
    /// Load configuration from `$EDGE_REWRITE_CONFIG`, falling back to "config"
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config".to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that would make the rewrite a no-op or non-idempotent
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let document = &self.rewrite.default_document;
        if document.is_empty() {
            return Err(config::ConfigError::Message(
                "rewrite.default_document must not be empty".to_string(),
            ));
        }
        if document.ends_with('/') {
            return Err(config::ConfigError::Message(format!(
                "rewrite.default_document must not end with '/': '{document}'"
            )));
        }
        Ok(())
    }

    /// Builder pre-populated with every default
    fn builder() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 9000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.format", "text")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("rewrite.default_document", crate::rewrite::DEFAULT_DOCUMENT)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
