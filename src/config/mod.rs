pub mod app_conf;
pub mod database_conf;
pub mod rate_limit_conf;

pub use app_conf::AppConfig;
pub use database_conf::DatabaseConfig;
pub use rate_limit_conf::RateLimitConfig;

use tracing::info;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Every configuration section the server needs, loaded together at start-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub rate_limit: RateLimitConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading application settings");
        let settings = Settings {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            rate_limit: RateLimitConfig::from_env()?,
        };
        Ok(settings)
    }

    /// In-memory database, proxy headers trusted, default throttle.
    pub fn from_test_env() -> Self {
        Settings {
            app: AppConfig::from_test_env(),
            database: DatabaseConfig::from_test_env(),
            rate_limit: RateLimitConfig::from_test_env(),
        }
    }
}
