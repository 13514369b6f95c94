//! Registry service: gate-checked CRUD over connection records plus the
//! cache-aware bypass read for same-host callers.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::cache_aside::{CacheLookup, RecordCache};
use crate::domain::errors::{RegistryError, RegistryResult};
use crate::domain::models::{
    AccessCredentials, CallerOrigin, ConnectionRecord, ConnectionRecordPatch, NewConnectionRecord,
};
use crate::domain::ports::{CredentialGate, KeyValueCache, OriginTrust, RegistryStore};

/// Orchestrates the gate, the store, the record cache and the trust predicate.
///
/// Every operation except `get_object_bypass` runs the credential gate to
/// completion before touching the store. The service holds no state of its
/// own beyond its collaborators, so one instance can serve every request.
#[derive(Clone)]
pub struct RegistryService {
    store: Arc<dyn RegistryStore>,
    gate: Arc<dyn CredentialGate>,
    cache: RecordCache,
    trust: Arc<dyn OriginTrust>,
}

impl RegistryService {
    pub fn new(
        store: Arc<dyn RegistryStore>,
        gate: Arc<dyn CredentialGate>,
        cache: Arc<dyn KeyValueCache>,
        trust: Arc<dyn OriginTrust>,
    ) -> Self {
        Self {
            store,
            gate,
            cache: RecordCache::new(cache),
            trust,
        }
    }

    /// Reject unless the gate authorizes the credentials.
    ///
    /// Unauthorized and Unreachable are reported identically to the caller.
    async fn authorize(&self, credentials: &AccessCredentials) -> RegistryResult<()> {
        let verdict = self.gate.check(credentials).await;
        if verdict.is_authorized() {
            Ok(())
        } else {
            info!(cluster = %credentials.cluster, %verdict, "access denied");
            Err(RegistryError::AccessDenied)
        }
    }

    #[instrument(skip(self, credentials), fields(cluster = %credentials.cluster))]
    pub async fn list_objects(
        &self,
        credentials: &AccessCredentials,
    ) -> RegistryResult<Vec<ConnectionRecord>> {
        self.authorize(credentials).await?;
        self.store.list().await
    }

    #[instrument(
        skip(self, credentials, payload),
        fields(cluster = %credentials.cluster, cluster_name = %payload.cluster_name)
    )]
    pub async fn create_object(
        &self,
        credentials: &AccessCredentials,
        payload: NewConnectionRecord,
    ) -> RegistryResult<ConnectionRecord> {
        self.authorize(credentials).await?;
        payload.validate().map_err(RegistryError::ValidationFailed)?;

        let record = self.store.create(&payload).await?;
        info!(id = record.id, "connection record created");
        Ok(record)
    }

    /// Authenticated single read. Always served from the store.
    #[instrument(skip(self, credentials), fields(cluster = %credentials.cluster))]
    pub async fn get_object(
        &self,
        credentials: &AccessCredentials,
        cluster_name: &str,
    ) -> RegistryResult<ConnectionRecord> {
        self.authorize(credentials).await?;
        self.store.get_by_cluster_name(cluster_name).await
    }

    /// Unauthenticated read for callers on the service's own host.
    ///
    /// Cache failures are soft: a failed lookup falls through to the store
    /// and a failed put is skipped. Store errors still surface.
    #[instrument(skip(self, origin), fields(%origin))]
    pub async fn get_object_bypass(
        &self,
        origin: &CallerOrigin,
        cluster_name: &str,
    ) -> RegistryResult<ConnectionRecord> {
        if !self.trust.is_trusted(origin) {
            warn!("bypass read refused for untrusted origin");
            return Err(RegistryError::UntrustedOrigin(origin.to_string()));
        }

        let lookup = self.cache.lookup(cluster_name).await.unwrap_or_else(|e| {
            warn!(error = %e, "cache lookup failed, reading from store");
            CacheLookup::Miss
        });

        debug!(hit = lookup.is_hit(), "cache lookup");
        if let CacheLookup::Hit(record) = lookup {
            return Ok(record);
        }

        let record = self.store.get_by_cluster_name(cluster_name).await?;
        if let Err(e) = self.cache.put(cluster_name, &record).await {
            warn!(error = %e, "cache put failed");
        }
        Ok(record)
    }

    #[instrument(skip(self, credentials, patch), fields(cluster = %credentials.cluster))]
    pub async fn update_object(
        &self,
        credentials: &AccessCredentials,
        cluster_name: &str,
        patch: ConnectionRecordPatch,
    ) -> RegistryResult<ConnectionRecord> {
        self.authorize(credentials).await?;

        let record = self.store.update(cluster_name, &patch).await?;
        self.invalidate_after_write(cluster_name).await;
        info!(id = record.id, "connection record updated");
        Ok(record)
    }

    #[instrument(skip(self, credentials), fields(cluster = %credentials.cluster))]
    pub async fn delete_object(
        &self,
        credentials: &AccessCredentials,
        cluster_name: &str,
    ) -> RegistryResult<()> {
        self.authorize(credentials).await?;

        self.store.delete(cluster_name).await?;
        self.invalidate_after_write(cluster_name).await;
        info!("connection record deleted");
        Ok(())
    }

    /// The write has committed; a failure here only risks a stale bypass read.
    async fn invalidate_after_write(&self, cluster_name: &str) {
        if let Err(e) = self.cache.invalidate(cluster_name).await {
            error!(
                error = %e,
                cluster_name,
                "cache invalidation failed, bypass reads may return a stale record"
            );
        }
    }
}
