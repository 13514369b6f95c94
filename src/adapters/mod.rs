//! Adapters implementing the domain ports and the inbound HTTP surface.

pub mod cache;
pub mod http;
pub mod sqlite;
