//! HTTP server adapters.

pub mod objects_http;

pub use objects_http::{ApiError, ObjectsHttpConfig, ObjectsHttpServer};
