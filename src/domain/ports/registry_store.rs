//! Registry store port.

use async_trait::async_trait;

use crate::domain::errors::RegistryResult;
use crate::domain::models::{ConnectionRecord, ConnectionRecordPatch, NewConnectionRecord};

/// Durable collection of connection records.
///
/// The store is the only source of truth. Implementations run each operation
/// inside their own transaction so concurrent writes against the same
/// cluster name never expose a half-applied record.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// All records, ordered by id.
    async fn list(&self) -> RegistryResult<Vec<ConnectionRecord>>;

    /// Insert a record and assign it a fresh id.
    ///
    /// Fails with `Conflict` if the cluster name or filer id is taken; the
    /// store is left unchanged in that case.
    async fn create(&self, payload: &NewConnectionRecord) -> RegistryResult<ConnectionRecord>;

    /// Fails with `NotFound` if no record has this cluster name.
    async fn get_by_cluster_name(&self, cluster_name: &str) -> RegistryResult<ConnectionRecord>;

    /// Fails with `NotFound` if no record has this id.
    async fn get_by_id(&self, id: i64) -> RegistryResult<ConnectionRecord>;

    /// Apply the supplied fields of `patch` and return the updated record.
    async fn update(
        &self,
        cluster_name: &str,
        patch: &ConnectionRecordPatch,
    ) -> RegistryResult<ConnectionRecord>;

    /// Remove the record permanently.
    async fn delete(&self, cluster_name: &str) -> RegistryResult<()>;
}
