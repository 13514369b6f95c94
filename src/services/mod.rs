//! Application services.

pub mod cache_aside;
pub mod registry_service;

pub use cache_aside::{CacheLookup, RecordCache};
pub use registry_service::RegistryService;
