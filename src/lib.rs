//! Cluster Registry
//!
//! HTTP service holding one message bus connection record per storage
//! cluster. Callers prove access by logging in to the cluster they name;
//! processes on the service's own host may read records through a
//! cache-aware bypass instead.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): records, access types, errors and port traits
//! - **Service Layer** (`services`): the registry service and its record cache
//! - **Adapters** (`adapters`): sqlite store, memory/redis caches, HTTP server
//! - **Infrastructure Layer** (`infrastructure`): config, logging, the
//!   cluster login gate, same-host trust and certificate helpers
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use cluster_registry::{ConfigLoader, ObjectsHttpServer, ObjectsHttpConfig};
//! use cluster_registry::cli::commands::serve::build_service;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let service = build_service(&config).await?;
//!     ObjectsHttpServer::new(service, ObjectsHttpConfig::from(&config.server))
//!         .serve()
//!         .await
//!         .map_err(|e| anyhow::anyhow!(e))
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::http::{ObjectsHttpConfig, ObjectsHttpServer};
pub use domain::models::{
    AccessCredentials, AccessVerdict, CallerOrigin, Config, ConnectionRecord,
    ConnectionRecordPatch, NewConnectionRecord,
};
pub use domain::ports::{CredentialGate, KeyValueCache, OriginTrust, RegistryStore};
pub use domain::{RegistryError, RegistryResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CacheLookup, RecordCache, RegistryService};
