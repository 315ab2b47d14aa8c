//! Cache backend implementations.
//!
//! Concrete implementations of [`orgdir_core::cache::Cache`]. The backend is
//! picked at runtime from [`CacheBackend`]; the Redis backend is only
//! available when the `redis` feature is compiled in.

use std::sync::Arc;

use anyhow::Result;

use orgdir_core::cache::Cache;

use crate::config::{CacheBackend, Config};

pub mod memory;
pub mod null;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use memory::MemoryCache;
pub use null::NullCache;

#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;

/// Builds the cache backend selected in `config`.
pub async fn build_cache(config: &Config) -> Result<Arc<dyn Cache>> {
    let cache: Arc<dyn Cache> = match config.cache_backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new(
            config.cache_max_entries,
            config.cache_keys_ttl(),
        )),
        CacheBackend::None => Arc::new(NullCache),
        CacheBackend::Redis => build_redis(config).await?,
    };

    tracing::info!(backend = %config.cache_backend, "Cache backend ready");
    Ok(cache)
}

#[cfg(feature = "redis")]
async fn build_redis(config: &Config) -> Result<Arc<dyn Cache>> {
    let cache = RedisCache::new(
        &config.redis_url,
        config.cache_keys_ttl(),
        config.cache_timeout(),
    )?;
    // An unreachable server only degrades caching; calls fall through to storage.
    if let Err(e) = cache.connect().await {
        tracing::warn!(error = %e, "Redis unavailable at startup, will retry on use");
    }
    Ok(Arc::new(cache))
}

#[cfg(not(feature = "redis"))]
async fn build_redis(_config: &Config) -> Result<Arc<dyn Cache>> {
    anyhow::bail!("cache backend 'redis' is not available: rebuild with the 'redis' feature")
}
