//! Cache configuration.
//!
//! Controls the Redis connection and TTL policy via `vetrina.toml`.

use std::time::Duration;

use serde::Deserialize;

// Default values for cache configuration
const DEFAULT_URL: &str = "redis://localhost:6379";
const DEFAULT_TTL_SECONDS: u64 = 300;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CONNECT_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 100;

/// Cache configuration from `vetrina.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the Redis cache layer. Disabled means every read goes to the
    /// durable store; the application stays fully functional.
    pub enabled: bool,
    /// Redis connection URL.
    pub url: String,
    /// Expiry applied to cached collections.
    pub ttl_seconds: u64,
    /// Per-attempt timeout when establishing the connection.
    pub connect_timeout_ms: u64,
    /// Bounded attempt count per connect cycle.
    pub connect_attempts: u32,
    /// Pause between connect attempts within a cycle.
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_URL.to_string(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            url: settings.url.clone(),
            ttl_seconds: settings.ttl_seconds,
            connect_timeout_ms: settings.connect_timeout_ms,
            connect_attempts: settings.connect_attempts,
            retry_delay_ms: settings.retry_delay_ms,
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Attempt count clamped so a connect cycle always tries at least once.
    pub fn connect_attempts_non_zero(&self) -> u32 {
        self.connect_attempts.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.ttl_seconds, 300);
        assert_eq!(config.connect_timeout_ms, 5_000);
        assert_eq!(config.connect_attempts, 3);
        assert_eq!(config.retry_delay_ms, 100);
    }

    #[test]
    fn ttl_converts_to_duration() {
        let config = CacheConfig {
            ttl_seconds: 60,
            ..Default::default()
        };
        assert_eq!(config.default_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn attempts_clamp_to_one() {
        let config = CacheConfig {
            connect_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.connect_attempts_non_zero(), 1);
    }
}
