//! Advisory generation lock.
//!
//! Best-effort, TTL-bounded mutual exclusion over the cache port. The lock
//! must survive process boundaries (web process vs. background worker), so
//! it is a cache key, not a language-level mutex. A lock that outlives its
//! TTL silently permits the next acquisition (fail-open): a crashed holder
//! can delay a retry, never block it forever.

use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::Cache;

/// TTL-bounded advisory lock marking a session's generation as in flight.
#[derive(Clone)]
pub struct AdvisoryLock {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl AdvisoryLock {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    fn key(session_id: Uuid) -> String {
        format!("generating:{session_id}")
    }

    /// Whether generation is currently marked in flight for the session.
    ///
    /// Cache failures read as "not held": the lock is advisory and the
    /// cache is not a source of truth.
    pub async fn is_held(&self, session_id: Uuid) -> bool {
        match self.cache.exists(&Self::key(session_id)).await {
            Ok(held) => held,
            Err(err) => {
                warn!(%session_id, error = %err, "lock probe failed; treating as not held");
                false
            }
        }
    }

    /// Try to mark generation in flight. Returns false when already held.
    pub async fn acquire(&self, session_id: Uuid) -> bool {
        let key = Self::key(session_id);
        if self.is_held(session_id).await {
            return false;
        }
        match self
            .cache
            .set(&key, serde_json::Value::Bool(true), self.ttl)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(%session_id, error = %err, "lock acquire failed; proceeding unlocked");
                // Fail-open: losing the marker only weakens dedup, it must
                // not block generation.
                true
            }
        }
    }

    /// Remove the in-flight marker. Called on every generation exit path.
    pub async fn release(&self, session_id: Uuid) {
        if let Err(err) = self.cache.delete(&Self::key(session_id)).await {
            warn!(%session_id, error = %err, "lock release failed; TTL will expire it");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryCache;

    fn lock() -> AdvisoryLock {
        AdvisoryLock::new(Arc::new(MemoryCache::new()), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_acquire_then_release() {
        let lock = lock();
        let session_id = Uuid::new_v4();

        assert!(!lock.is_held(session_id).await);
        assert!(lock.acquire(session_id).await);
        assert!(lock.is_held(session_id).await);

        lock.release(session_id).await;
        assert!(!lock.is_held(session_id).await);
    }

    #[tokio::test]
    async fn test_second_acquire_fails_while_held() {
        let lock = lock();
        let session_id = Uuid::new_v4();

        assert!(lock.acquire(session_id).await);
        assert!(!lock.acquire(session_id).await);
    }

    #[tokio::test]
    async fn test_locks_are_per_session() {
        let lock = lock();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(lock.acquire(a).await);
        assert!(lock.acquire(b).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_lock_reads_as_absent() {
        let cache = Arc::new(MemoryCache::new());
        let lock = AdvisoryLock::new(cache, Duration::from_millis(50));
        let session_id = Uuid::new_v4();

        assert!(lock.acquire(session_id).await);
        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!lock.is_held(session_id).await);
        assert!(lock.acquire(session_id).await);
    }
}
