use std::collections::HashSet;

use async_trait::async_trait;

use super::Result;

/// Best-effort storage of string sets under opaque keys.
///
/// Implementations report failures as [`CacheError`](super::CacheError); they
/// never decide whether a failure matters. That policy belongs to the caller.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Replaces the set stored under `key`. Storing an empty set is a no-op.
    async fn store_set(&self, key: &str, values: &HashSet<String>) -> Result<()>;

    /// Returns the set stored under `key`, or `None` if nothing is stored.
    async fn get_set(&self, key: &str) -> Result<Option<HashSet<String>>>;

    /// Removes `key`. Removing a missing key succeeds.
    async fn delete_key(&self, key: &str) -> Result<()>;
}
