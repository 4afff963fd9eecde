//! Cache-aside orchestration: read-through on lookups, coarse invalidation
//! on writes.
//!
//! Every backend failure here is absorbed: a failed read is a miss, a failed
//! write or invalidation is a no-op. The store remains the source of truth
//! and callers never see a cache error.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::client::{CacheClient, CacheError};
use super::config::CacheConfig;
use super::keys;

/// Counters exposed on the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub healthy: bool,
    pub hits: u64,
    pub misses: u64,
    pub errors: u64,
    pub invalidations: u64,
}

pub struct CacheAside {
    client: Arc<dyn CacheClient>,
    ttl_seconds: u64,
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
    invalidations: AtomicU64,
}

impl CacheAside {
    pub fn new(client: Arc<dyn CacheClient>, config: &CacheConfig) -> Self {
        Self {
            client,
            ttl_seconds: config.ttl_seconds,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.client.is_healthy()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            healthy: self.client.is_healthy(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }

    /// Fetch and deserialize a cached value. Any failure, including a stale
    /// payload that no longer deserializes, counts as a miss.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.client.is_healthy() {
            self.client.request_reconnect();
            self.record_miss(key);
            return None;
        }

        match self.client.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    metrics::counter!("vetrina_cache_hit_total").increment(1);
                    debug!(target = "vetrina::cache", key, "cache hit");
                    Some(value)
                }
                Err(err) => {
                    warn!(target = "vetrina::cache", key, error = %err, "cached payload did not deserialize");
                    self.record_error();
                    None
                }
            },
            Ok(None) => {
                self.record_miss(key);
                None
            }
            Err(err) => {
                self.absorb(key, "read", err);
                None
            }
        }
    }

    /// Store a value with the configured default TTL. Returns whether the
    /// write landed; callers may ignore the result.
    pub async fn write<T: Serialize>(&self, key: &str, value: &T) -> bool {
        self.write_with_ttl(key, value, self.ttl_seconds).await
    }

    pub async fn write_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) -> bool {
        if !self.client.is_healthy() {
            self.client.request_reconnect();
            return false;
        }

        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(target = "vetrina::cache", key, error = %err, "value did not serialize for caching");
                self.record_error();
                return false;
            }
        };

        match self.client.set_ex(key, &raw, ttl_seconds).await {
            Ok(()) => {
                debug!(target = "vetrina::cache", key, ttl_seconds, "cache write");
                true
            }
            Err(err) => {
                self.absorb(key, "write", err);
                false
            }
        }
    }

    /// Single-key removal, same unhealthy/no-op contract as `write`.
    pub async fn delete(&self, key: &str) -> bool {
        if !self.client.is_healthy() {
            self.client.request_reconnect();
            return false;
        }

        let keys = [key.to_string()];
        match self.client.del(&keys).await {
            Ok(_) => true,
            Err(err) => {
                self.absorb(key, "delete", err);
                false
            }
        }
    }

    /// Drop every key in the items namespace (enumerate, then bulk delete).
    /// Called after any successful store mutation; TTL bounds staleness if
    /// this fails.
    pub async fn invalidate_items(&self) -> bool {
        if !self.client.is_healthy() {
            self.client.request_reconnect();
            return false;
        }

        let pattern = keys::items_pattern();
        let matched = match self.client.keys_matching(&pattern).await {
            Ok(matched) => matched,
            Err(err) => {
                self.absorb(&pattern, "invalidate", err);
                return false;
            }
        };

        match self.client.del(&matched).await {
            Ok(dropped) => {
                self.invalidations.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("vetrina_cache_invalidate_total").increment(1);
                debug!(target = "vetrina::cache", dropped, "items cache invalidated");
                true
            }
            Err(err) => {
                self.absorb(&pattern, "invalidate", err);
                false
            }
        }
    }

    pub async fn shutdown(&self) {
        self.client.shutdown().await;
    }

    fn record_miss(&self, key: &str) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("vetrina_cache_miss_total").increment(1);
        debug!(target = "vetrina::cache", key, "cache miss");
    }

    fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("vetrina_cache_error_total").increment(1);
    }

    fn absorb(&self, key: &str, op: &'static str, err: CacheError) {
        warn!(target = "vetrina::cache", key, op, error = %err, "cache unavailable, continuing without it");
        self.record_error();
        if matches!(err, CacheError::Unavailable) {
            self.client.request_reconnect();
        }
    }
}
