use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Quote submission throttle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Submissions allowed per client address in one window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// Load throttle configuration from environment variables
    ///
    /// - RATE_LIMIT_MAX_REQUESTS: quota per window (defaults to 5)
    /// - RATE_LIMIT_WINDOW_SECS: window length (defaults to 900, i.e. 15 minutes)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading rate limit configuration from environment variables");

        let max_requests = env::var("RATE_LIMIT_MAX_REQUESTS")
            .unwrap_or_else(|_| {
                warn!("RATE_LIMIT_MAX_REQUESTS not set, using default: 5");
                "5".to_string()
            })
            .parse::<u32>()
            .map_err(|e| {
                error!("Invalid RATE_LIMIT_MAX_REQUESTS value: {}", e);
                ConfigError::ParseError(format!("Invalid max requests: {}", e))
            })?;
        debug!("Rate limit max requests: {}", max_requests);

        let window_secs = env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| {
                warn!("RATE_LIMIT_WINDOW_SECS not set, using default: 900");
                "900".to_string()
            })
            .parse::<u64>()
            .map_err(|e| {
                error!("Invalid RATE_LIMIT_WINDOW_SECS value: {}", e);
                ConfigError::ParseError(format!("Invalid window: {}", e))
            })?;
        debug!("Rate limit window: {} seconds", window_secs);

        let config = RateLimitConfig {
            max_requests,
            window_secs,
        };
        config.validate()?;
        info!("Rate limit configuration loaded successfully");
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_requests == 0 {
            error!("Rate limit max requests is 0");
            return Err(ConfigError::ValidationError(
                "Rate limit max requests must be greater than 0".to_string(),
            ));
        }
        if self.window_secs == 0 {
            error!("Rate limit window is 0");
            return Err(ConfigError::ValidationError(
                "Rate limit window must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        RateLimitConfig {
            max_requests: 5,
            window_secs: 15 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 5);
        assert_eq!(config.window(), Duration::from_secs(900));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_quota() {
        let mut config = RateLimitConfig::default();
        config.max_requests = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_window() {
        let mut config = RateLimitConfig::default();
        config.window_secs = 0;
        assert!(config.validate().is_err());
    }
}
