//! Courier Cache Crate
//!
//! Key-value cache adapter with per-key expiry. The [`CacheStore`] trait is
//! the only surface the rest of the backend sees; callers treat every error
//! as "cache unavailable" and fall through to the durable store, so an outage
//! here degrades read latency but never correctness.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod keys;
pub mod memory_cache;
pub mod redis_cache;

pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;

/// Cache-layer errors
#[derive(Debug, Error, Clone)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Interface to a key-value store with per-key TTL.
///
/// Values are serialized JSON strings; typed encoding stays with the caller
/// so the trait remains object-safe.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a value. Returns `None` when the key is absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Set a value with a TTL, overwriting any previous value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Delete a value. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Check backend connectivity.
    async fn ping(&self) -> CacheResult<()>;
}
