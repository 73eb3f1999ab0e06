use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::config::RateLimitConfig;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counter keyed by client address.
///
/// Each key gets `max_requests` admissions per `window`, the window opening at the key's
/// first request. State is per instance and is lost on restart.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        RateLimiter {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window())
    }

    /// Count one request for `key`. On rejection returns how long until the window resets.
    pub async fn try_acquire(&self, key: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        windows.retain(|_, w| now.duration_since(w.started) < self.window);

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if entry.count >= self.max_requests {
            let retry_after = self.window.saturating_sub(now.duration_since(entry.started));
            debug!(key, count = entry.count, "Rate limit exceeded");
            return Err(retry_after);
        }
        entry.count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_quota_is_per_key() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.try_acquire("10.0.0.1").await.is_ok());
        assert!(limiter.try_acquire("10.0.0.1").await.is_ok());
        assert!(limiter.try_acquire("10.0.0.1").await.is_err());
        assert!(limiter.try_acquire("10.0.0.2").await.is_ok());
        assert_eq!(limiter.windows.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_retry_after_is_within_window() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        limiter.try_acquire("a").await.unwrap();
        let retry_after = limiter.try_acquire("a").await.unwrap_err();
        assert!(retry_after <= Duration::from_secs(60));
        assert!(retry_after > Duration::from_secs(55));
    }

    #[tokio::test]
    async fn test_window_reset_admits_again() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));
        assert!(limiter.try_acquire("a").await.is_ok());
        assert!(limiter.try_acquire("a").await.is_err());
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(limiter.try_acquire("a").await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_windows_are_pruned() {
        let limiter = RateLimiter::new(3, Duration::from_millis(30));
        limiter.try_acquire("a").await.unwrap();
        limiter.try_acquire("b").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        limiter.try_acquire("c").await.unwrap();
        assert_eq!(limiter.windows.lock().await.len(), 1);
    }
}
