use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Take the client address from `X-Forwarded-For` when running behind a proxy
    pub trust_proxy: bool,
    /// Directory of pre-built pages served for non-API paths
    pub static_dir: Option<String>,
}

impl AppConfig {
    /// Load server configuration from environment variables
    ///
    /// Expected environment variables:
    /// - APP_HOST: bind address (defaults to 127.0.0.1)
    /// - APP_PORT: bind port (defaults to 3000)
    /// - TRUST_PROXY: honour X-Forwarded-For (defaults to false)
    /// - STATIC_DIR: static site directory (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading server configuration from environment variables");

        let host = env::var("APP_HOST").unwrap_or_else(|_| {
            warn!("APP_HOST not set, using default: 127.0.0.1");
            "127.0.0.1".to_string()
        });
        debug!("Server host: {}", host);

        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| {
                warn!("APP_PORT not set, using default: 3000");
                "3000".to_string()
            })
            .parse::<u16>()
            .map_err(|e| {
                error!("Invalid APP_PORT value: {}", e);
                ConfigError::ParseError(format!("Invalid port: {}", e))
            })?;
        debug!("Server port: {}", port);

        let trust_proxy = env::var("TRUST_PROXY")
            .ok()
            .map(|v| v.parse::<bool>().unwrap_or_else(|_| {
                warn!("Invalid TRUST_PROXY value, defaulting to false");
                false
            }))
            .unwrap_or(false);
        debug!("Trust proxy headers: {}", trust_proxy);

        let static_dir = env::var("STATIC_DIR").ok().filter(|d| !d.is_empty());
        match static_dir {
            Some(ref dir) => debug!("Serving static files from: {}", dir),
            None => debug!("No static directory configured"),
        }

        let config = AppConfig {
            host,
            port,
            trust_proxy,
            static_dir,
        };
        config.validate()?;
        info!("Server configuration loaded successfully");
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            trust_proxy: true,
            static_dir: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            error!("Server host is empty");
            return Err(ConfigError::ValidationError("Host cannot be empty".to_string()));
        }
        if self.host.parse::<std::net::IpAddr>().is_err() {
            error!("Server host is not an IP address: {}", self.host);
            return Err(ConfigError::InvalidValue(format!("Invalid host: {}", self.host)));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            trust_proxy: false,
            static_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert!(!config.trust_proxy);
        assert!(config.static_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = AppConfig::default();
        config.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_hostname_rejected() {
        let mut config = AppConfig::default();
        config.host = "localhost".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }
}
