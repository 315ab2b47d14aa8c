//! In-memory cache implementation with LRU eviction.
//!
//! Entries carry an optional expiry that is checked lazily on read.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use orgdir_core::cache::{Cache, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    values: HashSet<String>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(values: HashSet<String>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { values, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// In-memory cache of string sets with LRU eviction.
///
/// Thread-safe through `Arc<RwLock<LruCache>>`. Reads take the write lock
/// because an LRU lookup updates recency.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
    ttl: Option<Duration>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` sets, each kept for `ttl`
    /// when given.
    pub fn new(max_entries: NonZeroUsize, ttl: Option<Duration>) -> Self {
        Self {
            store: Arc::new(RwLock::new(LruCache::new(max_entries))),
            ttl,
        }
    }

    /// Number of stored entries, expired ones included.
    #[cfg(test)]
    pub async fn entry_count(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn store_set(&self, key: &str, values: &HashSet<String>) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(values.clone(), self.ttl));
        Ok(())
    }

    async fn get_set(&self, key: &str) -> Result<Option<HashSet<String>>> {
        let mut store = self.store.write().await;

        let expired = match store.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.values.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            store.pop(key);
        }
        Ok(None)
    }

    async fn delete_key(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn set(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_store_and_get() {
        let cache = MemoryCache::new(capacity(100), None);

        cache.store_set("ids", &set(&["a", "b"])).await.unwrap();

        assert_eq!(cache.get_set("ids").await.unwrap(), Some(set(&["a", "b"])));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = MemoryCache::new(capacity(100), None);
        assert_eq!(cache.get_set("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_replaces_previous_set() {
        let cache = MemoryCache::new(capacity(100), None);

        cache.store_set("ids", &set(&["a", "b"])).await.unwrap();
        cache.store_set("ids", &set(&["c"])).await.unwrap();

        assert_eq!(cache.get_set("ids").await.unwrap(), Some(set(&["c"])));
    }

    #[tokio::test]
    async fn test_storing_empty_set_is_a_no_op() {
        let cache = MemoryCache::new(capacity(100), None);

        cache.store_set("ids", &set(&["a"])).await.unwrap();
        cache.store_set("ids", &HashSet::new()).await.unwrap();
        cache.store_set("empty", &HashSet::new()).await.unwrap();

        assert_eq!(cache.get_set("ids").await.unwrap(), Some(set(&["a"])));
        assert_eq!(cache.get_set("empty").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_key() {
        let cache = MemoryCache::new(capacity(100), None);
        cache.store_set("ids", &set(&["a"])).await.unwrap();

        cache.delete_key("ids").await.unwrap();
        cache.delete_key("never-stored").await.unwrap();

        assert_eq!(cache.get_set("ids").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = MemoryCache::new(capacity(100), Some(Duration::from_millis(10)));
        cache.store_set("ids", &set(&["a"])).await.unwrap();
        assert!(cache.get_set("ids").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.get_set("ids").await.unwrap(), None);
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryCache::new(capacity(2), None);

        cache.store_set("k1", &set(&["1"])).await.unwrap();
        cache.store_set("k2", &set(&["2"])).await.unwrap();
        // Touch k1 so that k2 becomes the least recently used entry.
        cache.get_set("k1").await.unwrap();
        cache.store_set("k3", &set(&["3"])).await.unwrap();

        assert!(cache.get_set("k1").await.unwrap().is_some());
        assert!(cache.get_set("k2").await.unwrap().is_none());
        assert!(cache.get_set("k3").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let cache = MemoryCache::new(capacity(10), None);
        let clone = cache.clone();

        cache.store_set("ids", &set(&["a"])).await.unwrap();

        assert_eq!(clone.get_set("ids").await.unwrap(), Some(set(&["a"])));
    }
}
