//! CLI command implementations.

pub mod cert;
pub mod serve;
