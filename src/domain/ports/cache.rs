//! Cache port.
//!
//! TTL-bounded key/value store shared between the web-facing process and the
//! background worker. Used for whole-test result caching and as the backing
//! store of the advisory generation lock.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Error types for cache operations.
///
/// Callers treat cache failures as misses (fail-open): the cache is an
/// optimization and a best-effort coordination channel, never a source of
/// truth.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Port trait for TTL-expiring caches.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a value; `None` for absent or expired keys.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError>;

    /// Set a value with a time-to-live.
    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration)
        -> Result<(), CacheError>;

    /// Whether a live (unexpired) value exists for the key.
    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
