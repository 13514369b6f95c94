//! Domain layer for the cluster registry.
//!
//! This module contains the connection record model, the access types used
//! by the credential gate, and the port traits the service is composed from.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{RegistryError, RegistryResult};
