//! Infrastructure layer: configuration, logging, and the outbound
//! integrations the registry depends on.

pub mod certificates;
pub mod config;
pub mod gate;
pub mod logging;
pub mod trust;
