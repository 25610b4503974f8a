//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use chrono::Duration as TimeOffset;
use parky_db::{StoreConfig, DEFAULT_DATABASE_PATH};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Hostname/IP to listen on
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Path of the ticket store file
    pub database_path: PathBuf,

    /// Minutes new tickets are backdated by (0 outside demos)
    pub backdate_minutes: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (environment, test maps).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ServerConfig {
            host: lookup("PARKY_HOST").unwrap_or_else(|| "localhost".to_string()),

            port: lookup("PARKY_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PARKY_PORT".to_string()))?,

            database_path: lookup("PARKY_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),

            backdate_minutes: lookup("PARKY_BACKDATE_MINUTES")
                .unwrap_or_else(|| "0".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PARKY_BACKDATE_MINUTES".to_string()))?,
        };

        if config.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue("PARKY_HOST".to_string()));
        }

        if config.backdate_minutes < 0 {
            return Err(ConfigError::InvalidValue("PARKY_BACKDATE_MINUTES".to_string()));
        }

        Ok(config)
    }

    /// `host:port` string to bind to.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Store settings derived from this configuration.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.database_path)
            .time_in_offset(TimeOffset::minutes(self.backdate_minutes))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.listen_address(), "localhost:3000");
        assert_eq!(config.database_path, PathBuf::from("parkypark.db"));
        assert_eq!(config.backdate_minutes, 0);
        assert_eq!(config.store_config().time_in_offset, TimeOffset::zero());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PARKY_HOST", "0.0.0.0"),
            ("PARKY_PORT", "8080"),
            ("PARKY_DATABASE_PATH", "/tmp/demo.db"),
            ("PARKY_BACKDATE_MINUTES", "350"),
        ])
        .unwrap();

        assert_eq!(config.listen_address(), "0.0.0.0:8080");

        let store = config.store_config();
        assert_eq!(store.database_path, PathBuf::from("/tmp/demo.db"));
        assert_eq!(store.time_in_offset, TimeOffset::minutes(350));
        assert_eq!(store.bucket, "Tickets");
    }

    #[test]
    fn test_invalid_values() {
        let err = config_from(&[("PARKY_PORT", "eighty")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PARKY_PORT");

        assert!(config_from(&[("PARKY_BACKDATE_MINUTES", "-5")]).is_err());
        assert!(config_from(&[("PARKY_HOST", " ")]).is_err());
    }
}
