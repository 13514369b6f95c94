//! Common test utilities for integration tests
//!
//! Provides shared fixtures and collaborator fakes used across the
//! registry integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cluster_registry::adapters::cache::MemoryCache;
use cluster_registry::adapters::sqlite::{create_migrated_test_pool, SqliteRegistryStore};
use cluster_registry::domain::models::{
    AccessCredentials, AccessVerdict, CallerOrigin, ConnectionRecord, ConnectionRecordPatch,
    NewConnectionRecord,
};
use cluster_registry::domain::ports::{CredentialGate, KeyValueCache, OriginTrust, RegistryStore};
use cluster_registry::{RegistryError, RegistryResult, RegistryService};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Gate that authorizes exactly one username/password pair.
///
/// Any other pair is `Unauthorized`; a cluster named `offline` is
/// `Unreachable`.
pub struct StaticGate {
    username: String,
    password: String,
    checks: AtomicUsize,
}

impl StaticGate {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            checks: AtomicUsize::new(0),
        }
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialGate for StaticGate {
    async fn check(&self, credentials: &AccessCredentials) -> AccessVerdict {
        self.checks.fetch_add(1, Ordering::SeqCst);
        if credentials.cluster == "offline" {
            AccessVerdict::Unreachable
        } else if credentials.username == self.username && credentials.password == self.password {
            AccessVerdict::Authorized
        } else {
            AccessVerdict::Unauthorized
        }
    }
}

/// Trust predicate with a fixed answer.
pub struct FixedTrust(pub bool);

impl OriginTrust for FixedTrust {
    fn is_trusted(&self, _origin: &CallerOrigin) -> bool {
        self.0
    }
}

/// Store wrapper counting single-record reads.
pub struct CountingStore<S> {
    inner: S,
    reads: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: RegistryStore> RegistryStore for CountingStore<S> {
    async fn list(&self) -> RegistryResult<Vec<ConnectionRecord>> {
        self.inner.list().await
    }

    async fn create(&self, payload: &NewConnectionRecord) -> RegistryResult<ConnectionRecord> {
        self.inner.create(payload).await
    }

    async fn get_by_cluster_name(&self, cluster_name: &str) -> RegistryResult<ConnectionRecord> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_cluster_name(cluster_name).await
    }

    async fn get_by_id(&self, id: i64) -> RegistryResult<ConnectionRecord> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_id(id).await
    }

    async fn update(
        &self,
        cluster_name: &str,
        patch: &ConnectionRecordPatch,
    ) -> RegistryResult<ConnectionRecord> {
        self.inner.update(cluster_name, patch).await
    }

    async fn delete(&self, cluster_name: &str) -> RegistryResult<()> {
        self.inner.delete(cluster_name).await
    }
}

/// Cache whose every call fails as if the backend were down.
pub struct UnavailableCache;

#[async_trait]
impl KeyValueCache for UnavailableCache {
    async fn get(&self, _key: &str) -> RegistryResult<Option<Vec<u8>>> {
        Err(RegistryError::CacheUnavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>) -> RegistryResult<()> {
        Err(RegistryError::CacheUnavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> RegistryResult<()> {
        Err(RegistryError::CacheUnavailable("connection refused".to_string()))
    }
}

/// Everything a registry test needs to observe.
pub struct Harness {
    pub service: RegistryService,
    pub store: Arc<CountingStore<SqliteRegistryStore>>,
    pub gate: Arc<StaticGate>,
    pub cache: Arc<MemoryCache>,
}

/// Service over an in-memory database and cache, authorizing admin/admin.
pub async fn harness(trusted: bool) -> Harness {
    let pool = create_migrated_test_pool().await.expect("Failed to create test pool");
    let store = Arc::new(CountingStore::new(SqliteRegistryStore::new(pool)));
    let gate = Arc::new(StaticGate::new("admin", "admin"));
    let cache = Arc::new(MemoryCache::new());

    let service = RegistryService::new(
        store.clone(),
        gate.clone(),
        cache.clone(),
        Arc::new(FixedTrust(trusted)),
    );

    Harness {
        service,
        store,
        gate,
        cache,
    }
}

/// Service whose cache backend is down.
pub async fn harness_with_unavailable_cache() -> (RegistryService, Arc<CountingStore<SqliteRegistryStore>>) {
    let pool = create_migrated_test_pool().await.expect("Failed to create test pool");
    let store = Arc::new(CountingStore::new(SqliteRegistryStore::new(pool)));
    let service = RegistryService::new(
        store.clone(),
        Arc::new(StaticGate::new("admin", "admin")),
        Arc::new(UnavailableCache),
        Arc::new(FixedTrust(true)),
    );
    (service, store)
}

pub fn admin(cluster: &str) -> AccessCredentials {
    AccessCredentials::new(cluster, "admin", "admin")
}

pub fn record_payload(cluster_name: &str, filer_id: i64) -> NewConnectionRecord {
    NewConnectionRecord {
        cluster_name: cluster_name.to_string(),
        certificate: "LS0tLS1CRUdJTiBDRVJUSUZJQ0FURS0tLS0t".to_string(),
        filer_id,
        server: "rmq.internal".to_string(),
        port: 5671,
        vhost: "/".to_string(),
        exchange: "cluster-events".to_string(),
        username: "publisher".to_string(),
        password: "publisher-secret".to_string(),
    }
}

pub fn gateway_origin() -> CallerOrigin {
    CallerOrigin::from_peer("172.18.0.1".parse().expect("valid ip"))
}

/// Layer recording every event's level and message.
///
/// Install with `tracing::subscriber::set_default` inside a current-thread
/// test so only that test's events are seen.
#[derive(Clone, Default)]
pub struct CapturedEvents {
    events: Arc<std::sync::Mutex<Vec<(tracing::Level, String)>>>,
}

impl CapturedEvents {
    pub fn at(&self, level: tracing::Level) -> Vec<String> {
        self.events
            .lock()
            .expect("captured events lock")
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CapturedEvents {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .expect("captured events lock")
            .push((*event.metadata().level(), visitor.0));
    }
}
