use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::cache::{self, Cache, CacheError};
use crate::storage;

/// Default bound on a single cache call.
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(500);

/// Fail-soft view of a [`Cache`] holding sets of IDs.
///
/// Every call is bounded by a timeout. Errors, including the timeout, are
/// logged and turned into "absent" for reads and into no-ops for writes, so
/// a broken cache backend only costs repository round-trips.
#[derive(Clone)]
pub struct IdSetCache {
    cache: Arc<dyn Cache>,
    timeout: Duration,
}

impl IdSetCache {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self::with_timeout(cache, DEFAULT_CACHE_TIMEOUT)
    }

    pub fn with_timeout(cache: Arc<dyn Cache>, timeout: Duration) -> Self {
        Self { cache, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T>(&self, call: impl Future<Output = cache::Result<T>>) -> cache::Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(
                u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }

    /// Returns the cached set, or `None` on a miss or any cache failure.
    pub async fn get(&self, key: &str) -> Option<HashSet<String>> {
        match self.bounded(self.cache.get_set(key)).await {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to read cached ID set");
                None
            }
        }
    }

    /// Caches `ids` under `key`, replacing whatever was there.
    pub async fn store(&self, key: &str, ids: &HashSet<Uuid>) {
        let values: HashSet<String> = ids.iter().map(Uuid::to_string).collect();
        if let Err(err) = self.bounded(self.cache.store_set(key, &values)).await {
            tracing::warn!(key = %key, error = %err, "Failed to cache ID set");
        }
    }

    /// Drops the set cached under `key`.
    pub async fn invalidate(&self, key: &str) {
        if let Err(err) = self.bounded(self.cache.delete_key(key)).await {
            tracing::warn!(key = %key, error = %err, "Failed to invalidate cached ID set");
        }
    }

    /// Tells whether `id` belongs to the set under `key`.
    ///
    /// On a hit the answer comes from the cache alone. On a miss `load`
    /// fetches the authoritative set, which is cached before answering.
    pub async fn contains<F, Fut>(&self, key: &str, id: Uuid, load: F) -> storage::Result<bool>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = storage::Result<HashSet<Uuid>>>,
    {
        if let Some(cached) = self.get(key).await {
            tracing::trace!(key = %key, id = %id, "Cache hit for ID set");
            return Ok(cached.contains(&id.to_string()));
        }

        tracing::trace!(key = %key, id = %id, "Cache miss for ID set");
        let ids = load().await?;
        self.store(key, &ids).await;
        Ok(ids.contains(&id))
    }
}
