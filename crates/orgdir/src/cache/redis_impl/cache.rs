//! Redis cache implementation.
//!
//! Each ID set is a native Redis Set. Replacing a set runs `DEL`, `SADD`
//! and the optional `EXPIRE` in one `MULTI`/`EXEC` pipeline, so readers
//! never observe a half-written set.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::OnceCell;

use orgdir_core::cache::{Cache, CacheError, Result};

use super::error::map_redis_error;

/// Redis cache backend using connection manager for pooling.
///
/// The connection is opened on first use. An unreachable server fails that
/// call after `connect_timeout` and the next call tries again.
pub struct RedisCache {
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
    connect_timeout: Duration,
    ttl: Option<Duration>,
}

impl RedisCache {
    /// Creates a Redis cache for `url` without connecting.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::OperationFailed` if the URL cannot be parsed.
    pub fn new(url: &str, ttl: Option<Duration>, connect_timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        Ok(Self {
            client,
            conn: OnceCell::new(),
            connect_timeout,
            ttl,
        })
    }

    /// Opens the connection now instead of on the first cache call.
    pub async fn connect(&self) -> Result<()> {
        self.connection().await.map(|_| ())
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                let connect = ConnectionManager::new(self.client.clone());
                match tokio::time::timeout(self.connect_timeout, connect).await {
                    Ok(result) => result.map_err(map_redis_error),
                    Err(_) => Err(CacheError::Timeout(
                        u64::try_from(self.connect_timeout.as_millis()).unwrap_or(u64::MAX),
                    )),
                }
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn store_set(&self, key: &str, values: &HashSet<String>) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }

        let mut conn = self.connection().await?;
        let mut pipe = redis::pipe();
        pipe.atomic().del(key).ignore().sadd(key, values).ignore();
        if let Some(ttl) = self.ttl {
            let seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX).max(1);
            pipe.expire(key, seconds).ignore();
        }

        let () = pipe.query_async(&mut conn).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn get_set(&self, key: &str) -> Result<Option<HashSet<String>>> {
        let mut conn = self.connection().await?;
        let members: HashSet<String> = conn.smembers(key).await.map_err(map_redis_error)?;

        // Redis has no empty sets: an empty reply means the key is absent.
        if members.is_empty() {
            Ok(None)
        } else {
            Ok(Some(members))
        }
    }

    async fn delete_key(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key).await.map_err(map_redis_error)?;
        Ok(())
    }
}
