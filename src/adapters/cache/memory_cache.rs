//! Process-local key-value cache using moka.
//!
//! Entries never expire on their own; they leave the cache only through
//! `delete` or capacity eviction.

use async_trait::async_trait;
use moka::future::Cache;

use crate::domain::errors::RegistryResult;
use crate::domain::ports::KeyValueCache;

/// Default maximum number of cached entries.
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// In-memory `KeyValueCache`. Not shared between service instances.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, Vec<u8>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        let entries = Cache::builder().max_capacity(max_capacity).build();
        Self { entries }
    }

    /// Whether `key` is currently cached.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> RegistryResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).await)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> RegistryResult<()> {
        self.entries.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> RegistryResult<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("c1").await.unwrap(), None);

        cache.set("c1", b"{}".to_vec()).await.unwrap();
        assert_eq!(cache.get("c1").await.unwrap(), Some(b"{}".to_vec()));
        assert!(cache.contains("c1"));

        cache.delete("c1").await.unwrap();
        assert_eq!(cache.get("c1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let cache = MemoryCache::new();
        assert!(cache.delete("never-set").await.is_ok());
    }
}
