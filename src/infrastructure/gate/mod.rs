//! Credential gate against the cluster REST API.

pub mod client;
pub mod errors;

pub use client::{ClusterGate, LoginSession};
pub use errors::GateError;
