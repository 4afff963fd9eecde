//! Redis connection handle with explicit health tracking.
//!
//! One `RedisCacheClient` exists per process. It owns the multiplexed
//! connection and a small state machine:
//!
//! ```text
//! Disconnected -> Connecting -> Ready
//!       ^                         |
//!       +----- Reconnecting <-----+   (on transport error)
//! ```
//!
//! `Reconnecting` is a transient sub-state; externally visible health stays
//! false until `Ready` is reached again. Backend errors are logged and
//! recorded in the state flag, never raised past this module as anything the
//! caller must handle. Consumers check `is_healthy()` or treat the returned
//! error as a miss.

use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use thiserror::Error;
use tokio::sync::{Notify, RwLock};
use tracing::{debug, info, warn};

use super::config::CacheConfig;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable")]
    Unavailable,
    #[error("cache backend error: {0}")]
    Backend(#[from] redis::RedisError),
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connecting = 1,
    Ready = 2,
    Reconnecting = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::Ready,
            3 => Self::Reconnecting,
            _ => Self::Disconnected,
        }
    }
}

/// Narrow interface the cache-aside service depends on.
///
/// Kept as a trait so tests can substitute an in-memory double and so the
/// rest of the application never touches the redis crate directly.
#[async_trait]
pub trait CacheClient: Send + Sync {
    fn is_healthy(&self) -> bool;

    /// Nudge a background reconnect without blocking the caller.
    fn request_reconnect(&self);

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError>;

    async fn del(&self, keys: &[String]) -> Result<u64, CacheError>;

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, CacheError>;

    /// Graceful teardown: drop the handle and reset state so a later
    /// connect cycle starts fresh.
    async fn shutdown(&self);
}

pub struct RedisCacheClient {
    client: redis::Client,
    conn: RwLock<Option<MultiplexedConnection>>,
    state: AtomicU8,
    reconnect: Notify,
    config: CacheConfig,
}

impl RedisCacheClient {
    /// Parse the URL and build the handle. Never touches the network, so an
    /// unreachable backend cannot fail startup.
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        let client = redis::Client::open(config.url.as_str())?;
        Ok(Self {
            client,
            conn: RwLock::new(None),
            state: AtomicU8::new(ConnectionState::Disconnected as u8),
            reconnect: Notify::new(),
            config,
        })
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Idempotent connect: returns immediately when already `Ready`,
    /// otherwise runs one bounded attempt cycle.
    pub async fn ensure_connected(&self) -> bool {
        if self.state() == ConnectionState::Ready {
            return true;
        }

        self.set_state(ConnectionState::Connecting);
        let attempts = self.config.connect_attempts_non_zero();

        for attempt in 1..=attempts {
            let connect = self.client.get_multiplexed_async_connection();
            match tokio::time::timeout(self.config.connect_timeout(), connect).await {
                Ok(Ok(conn)) => {
                    *self.conn.write().await = Some(conn);
                    self.set_state(ConnectionState::Ready);
                    info!(target = "vetrina::cache", "cache backend connected and ready");
                    return true;
                }
                Ok(Err(err)) => {
                    warn!(
                        target = "vetrina::cache",
                        attempt,
                        attempts,
                        error = %err,
                        "cache connect attempt failed"
                    );
                }
                Err(_) => {
                    warn!(
                        target = "vetrina::cache",
                        attempt,
                        attempts,
                        timeout_ms = self.config.connect_timeout_ms,
                        "cache connect attempt timed out"
                    );
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.config.retry_delay()).await;
            }
        }

        self.set_state(ConnectionState::Disconnected);
        false
    }

    /// Background loop reacting to `request_reconnect` nudges. Spawned once
    /// at startup; aborted on shutdown.
    pub fn spawn_reconnect_task(self: std::sync::Arc<Self>) -> tokio::task::JoinHandle<()> {
        let client = self;
        tokio::spawn(async move {
            loop {
                client.reconnect.notified().await;
                if client.state() == ConnectionState::Ready {
                    continue;
                }
                client.set_state(ConnectionState::Reconnecting);
                debug!(target = "vetrina::cache", "cache reconnect cycle starting");
                client.ensure_connected().await;
            }
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        if self.state() != ConnectionState::Ready {
            return Err(CacheError::Unavailable);
        }
        self.conn
            .read()
            .await
            .clone()
            .ok_or(CacheError::Unavailable)
    }

    /// A transport error drops health to `Disconnected` and nudges the
    /// reconnect loop; the failed operation surfaces as a miss upstream.
    fn note_failure(&self, op: &'static str, err: &redis::RedisError) {
        warn!(target = "vetrina::cache", op, error = %err, "cache operation failed");
        self.set_state(ConnectionState::Disconnected);
        self.reconnect.notify_one();
    }
}

#[async_trait]
impl CacheClient for RedisCacheClient {
    fn is_healthy(&self) -> bool {
        self.state() == ConnectionState::Ready
    }

    fn request_reconnect(&self) {
        self.reconnect.notify_one();
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.note_failure("get", &err);
                Err(CacheError::Backend(err))
            }
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        match conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.note_failure("set_ex", &err);
                Err(CacheError::Backend(err))
            }
        }
    }

    async fn del(&self, keys: &[String]) -> Result<u64, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.connection().await?;
        match conn.del::<_, u64>(keys).await {
            Ok(count) => Ok(count),
            Err(err) => {
                self.note_failure("del", &err);
                Err(CacheError::Backend(err))
            }
        }
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.connection().await?;
        match conn.keys::<_, Vec<String>>(pattern).await {
            Ok(keys) => Ok(keys),
            Err(err) => {
                self.note_failure("keys", &err);
                Err(CacheError::Backend(err))
            }
        }
    }

    async fn shutdown(&self) {
        *self.conn.write().await = None;
        self.set_state(ConnectionState::Disconnected);
        info!(target = "vetrina::cache", "cache connection closed gracefully");
    }
}
