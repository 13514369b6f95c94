//! Port trait definitions (Hexagonal Architecture)
//!
//! The registry service is composed from these interfaces:
//! - RegistryStore: durable CRUD over connection records
//! - KeyValueCache: byte cache behind the bypass read
//! - CredentialGate: login check against the target cluster
//! - OriginTrust: same-host predicate for the bypass read

pub mod credential_gate;
pub mod key_value_cache;
pub mod origin_trust;
pub mod registry_store;

pub use credential_gate::CredentialGate;
pub use key_value_cache::KeyValueCache;
pub use origin_trust::OriginTrust;
pub use registry_store::RegistryStore;
