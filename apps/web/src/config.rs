//! Web server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use std::env;
use std::path::PathBuf;

use bazaar_core::MAX_CONTENT_LENGTH;

/// Web server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Interface to bind (`BAZAAR_BIND_ADDR`)
    pub bind_addr: String,

    /// HTTP port (`BAZAAR_PORT`)
    pub port: u16,

    /// SQLite database file (`BAZAAR_DATABASE_PATH`)
    pub database_path: PathBuf,

    /// Directory holding uploaded images (`BAZAAR_UPLOADS_DIR`)
    pub uploads_dir: PathBuf,

    /// Request body cap in bytes (`BAZAAR_MAX_BODY_BYTES`, default: 16MB)
    pub max_body_bytes: usize,
}

impl WebConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = WebConfig {
            bind_addr: lookup("BAZAAR_BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("BAZAAR_PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BAZAAR_PORT".to_string()))?,

            database_path: lookup("BAZAAR_DATABASE_PATH")
                .unwrap_or_else(|| "db/bazaar.db".to_string())
                .into(),

            uploads_dir: lookup("BAZAAR_UPLOADS_DIR")
                .unwrap_or_else(|| "uploads".to_string())
                .into(),

            max_body_bytes: lookup("BAZAAR_MAX_BODY_BYTES")
                .map(|raw| raw.parse())
                .transpose()
                .map_err(|_| ConfigError::InvalidValue("BAZAAR_MAX_BODY_BYTES".to_string()))?
                .unwrap_or(MAX_CONTENT_LENGTH),
        };

        if config.bind_addr.trim().is_empty() {
            return Err(ConfigError::InvalidValue("BAZAAR_BIND_ADDR".to_string()));
        }
        if config.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue("BAZAAR_MAX_BODY_BYTES".to_string()));
        }

        Ok(config)
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
