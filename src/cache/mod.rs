//! Vetrina cache layer.
//!
//! A read-through / write-invalidate cache in front of the item repository:
//!
//! - **Client** (`client`): one Redis connection handle per process with
//!   explicit connection-state tracking. Backend failures never escape this
//!   module; they flip the health flag and get logged.
//! - **Cache-aside service** (`service`): key derivation, TTL policy, and the
//!   get/set/invalidate operations the catalog service calls. Unhealthy or
//!   failing cache degrades to "miss"; correctness never depends on it.
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `vetrina.toml`:
//!
//! ```toml
//! [cache]
//! enabled = true
//! url = "redis://localhost:6379"
//! ttl_seconds = 300
//! ```

mod config;
mod client;
pub mod keys;
mod service;

pub use client::{CacheClient, CacheError, ConnectionState, RedisCacheClient};
pub use config::CacheConfig;
pub use service::{CacheAside, CacheStats};
