//! Cache that stores nothing.

use std::collections::HashSet;

use async_trait::async_trait;

use orgdir_core::cache::{Cache, Result};

/// Every read misses and every write is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

#[async_trait]
impl Cache for NullCache {
    async fn store_set(&self, _key: &str, _values: &HashSet<String>) -> Result<()> {
        Ok(())
    }

    async fn get_set(&self, _key: &str) -> Result<Option<HashSet<String>>> {
        Ok(None)
    }

    async fn delete_key(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}
