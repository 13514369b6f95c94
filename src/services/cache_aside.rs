//! Cache-aside layer for the bypass read.
//!
//! Records are stored as JSON bytes keyed by cluster name. Nothing here
//! expires entries; the registry service invalidates keys after every
//! successful update or delete.

use std::sync::Arc;

use crate::domain::errors::RegistryResult;
use crate::domain::models::ConnectionRecord;
use crate::domain::ports::KeyValueCache;

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(ConnectionRecord),
    Miss,
}

impl CacheLookup {
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// Typed view over a `KeyValueCache` holding connection records.
#[derive(Clone)]
pub struct RecordCache {
    backend: Arc<dyn KeyValueCache>,
}

impl RecordCache {
    pub fn new(backend: Arc<dyn KeyValueCache>) -> Self {
        Self { backend }
    }

    /// Look up the record cached under `cluster_name`.
    ///
    /// An entry that no longer decodes is reported as a serialization error
    /// rather than a miss, so the caller can decide how loud to be.
    pub async fn lookup(&self, cluster_name: &str) -> RegistryResult<CacheLookup> {
        match self.backend.get(cluster_name).await? {
            Some(bytes) => {
                let record: ConnectionRecord = serde_json::from_slice(&bytes)?;
                Ok(CacheLookup::Hit(record))
            }
            None => Ok(CacheLookup::Miss),
        }
    }

    pub async fn put(&self, cluster_name: &str, record: &ConnectionRecord) -> RegistryResult<()> {
        let bytes = serde_json::to_vec(record)?;
        self.backend.set(cluster_name, bytes).await
    }

    /// Drop the entry for `cluster_name`. Idempotent.
    pub async fn invalidate(&self, cluster_name: &str) -> RegistryResult<()> {
        self.backend.delete(cluster_name).await
    }
}
