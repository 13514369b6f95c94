pub mod access;
pub mod config;
pub mod connection_record;

pub use access::{AccessCredentials, AccessVerdict, CallerOrigin};
pub use config::{
    CacheBackend, CacheConfig, Config, DatabaseConfig, GateConfig, LogFormat, LoggingConfig,
    RotationPolicy, ServerConfig, TrustConfig,
};
pub use connection_record::{ConnectionRecord, ConnectionRecordPatch, NewConnectionRecord};
