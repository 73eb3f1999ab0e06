use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// SQLite configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://quotes.db` or `sqlite::memory:`
    pub url: String,
    /// Connection pool size
    pub pool_size: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Load database configuration from environment variables
    ///
    /// Expected environment variables:
    /// - DATABASE_URL: SQLite URL (defaults to sqlite://quotes.db)
    /// - DATABASE_POOL_SIZE: Connection pool size (defaults to 5)
    /// - DATABASE_CONNECTION_TIMEOUT: Acquire timeout in seconds (defaults to 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading database configuration from environment variables");

        let url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            warn!("DATABASE_URL not set, using default: sqlite://quotes.db");
            "sqlite://quotes.db".to_string()
        });
        debug!("Database URL: {}", url);

        let pool_size = env::var("DATABASE_POOL_SIZE")
            .unwrap_or_else(|_| {
                warn!("DATABASE_POOL_SIZE not set, using default: 5");
                "5".to_string()
            })
            .parse::<u32>()
            .map_err(|_| {
                error!("Invalid DATABASE_POOL_SIZE value");
                ConfigError::InvalidValue("Invalid DATABASE_POOL_SIZE value".to_string())
            })?;
        debug!("Database pool size: {}", pool_size);

        let connection_timeout_secs = env::var("DATABASE_CONNECTION_TIMEOUT")
            .unwrap_or_else(|_| {
                warn!("DATABASE_CONNECTION_TIMEOUT not set, using default: 5 seconds");
                "5".to_string()
            })
            .parse::<u64>()
            .map_err(|_| {
                error!("Invalid DATABASE_CONNECTION_TIMEOUT value");
                ConfigError::InvalidValue("Invalid DATABASE_CONNECTION_TIMEOUT value".to_string())
            })?;
        debug!("Database connection timeout: {} seconds", connection_timeout_secs);

        let config = DatabaseConfig {
            url,
            pool_size,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("Database configuration loaded successfully");
        Ok(config)
    }

    /// Private in-memory database for tests
    pub fn from_test_env() -> Self {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            connection_timeout_secs: 2,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        info!("Validating database configuration");

        if self.url.is_empty() {
            error!("Database URL is empty");
            return Err(ConfigError::ValidationError("Database URL cannot be empty".to_string()));
        }

        if !self.url.starts_with("sqlite:") {
            error!("Database URL is not a sqlite URL: {}", self.url);
            return Err(ConfigError::ValidationError(
                "Database URL must start with sqlite:".to_string(),
            ));
        }

        if self.pool_size == 0 {
            error!("Database pool size is 0");
            return Err(ConfigError::ValidationError(
                "Database pool size must be greater than 0".to_string(),
            ));
        }

        if self.connection_timeout_secs == 0 {
            error!("Database connection timeout is 0");
            return Err(ConfigError::ValidationError(
                "Database connection timeout must be greater than 0".to_string(),
            ));
        }

        info!("Database configuration validation successful");
        Ok(())
    }

    /// In-memory databases live and die with a single connection.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: "sqlite://quotes.db".to_string(),
            pool_size: 5,
            connection_timeout_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.url, "sqlite://quotes.db");
        assert_eq!(config.pool_size, 5);
        assert_eq!(config.connection_timeout_secs, 5);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_test_config() {
        let config = DatabaseConfig::from_test_env();
        assert!(config.is_in_memory());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_url() {
        let mut config = DatabaseConfig::default();
        config.url = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_non_sqlite_url() {
        let mut config = DatabaseConfig::default();
        config.url = "postgres://localhost/quotes".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_pool_size() {
        let mut config = DatabaseConfig::default();
        config.pool_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = DatabaseConfig::default();
        config.connection_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
