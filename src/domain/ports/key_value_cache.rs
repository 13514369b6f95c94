//! Key-value cache port.

use async_trait::async_trait;

use crate::domain::errors::RegistryResult;

/// Byte-oriented key-value store backing the record cache.
///
/// No expiry is assumed. Errors mean the backend could not be reached and
/// are reported as `CacheUnavailable`.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get(&self, key: &str) -> RegistryResult<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: Vec<u8>) -> RegistryResult<()>;

    /// Remove `key`. Removing a key that is not present succeeds.
    async fn delete(&self, key: &str) -> RegistryResult<()>;
}
