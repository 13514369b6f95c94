use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Main configuration structure for the cluster registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Record cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Credential gate configuration
    #[serde(default)]
    pub gate: GateConfig,

    /// Same-host trust configuration for the bypass read
    #[serde(default)]
    pub trust: TrustConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: false,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    "data/registry.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Which key-value store backs the record cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local cache, not shared between instances
    #[default]
    Memory,
    /// Shared Redis / KeyDB instance
    Redis,
}

/// Record cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// `host:port`, optionally prefixed with `redis://` or `rediss://`
    #[serde(default = "default_redis_endpoint")]
    pub redis_endpoint: String,

    /// Name of the environment variable holding the Redis password
    #[serde(default = "default_redis_password_env")]
    pub redis_password_env: String,

    #[serde(default)]
    pub redis_tls: bool,

    /// Entry cap for the in-memory backend
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: u64,
}

fn default_redis_endpoint() -> String {
    "redis:6379".to_string()
}

fn default_redis_password_env() -> String {
    "REDIS_PASSWORD".to_string()
}

const fn default_memory_capacity() -> u64 {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            redis_endpoint: default_redis_endpoint(),
            redis_password_env: default_redis_password_env(),
            redis_tls: false,
            memory_capacity: default_memory_capacity(),
        }
    }
}

/// Credential gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GateConfig {
    /// URL scheme used to reach the cluster REST API
    #[serde(default = "default_gate_scheme")]
    pub scheme: String,

    /// Port of the cluster REST API
    #[serde(default = "default_gate_port")]
    pub port: u16,

    /// Timeout applied to each outbound call, in seconds
    #[serde(default = "default_gate_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip certificate validation. Clusters usually serve self-signed
    /// certificates, so this defaults to true.
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,
}

fn default_gate_scheme() -> String {
    "https".to_string()
}

const fn default_gate_port() -> u16 {
    8000
}

const fn default_gate_timeout_secs() -> u64 {
    5
}

const fn default_true() -> bool {
    true
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            scheme: default_gate_scheme(),
            port: default_gate_port(),
            timeout_secs: default_gate_timeout_secs(),
            accept_invalid_certs: default_true(),
        }
    }
}

/// Same-host trust configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrustConfig {
    /// Interface whose IPv4 network is used to infer the gateway
    #[serde(default = "default_interface")]
    pub interface: String,

    /// Fixed gateway address; overrides interface inference when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<IpAddr>,
}

fn default_interface() -> String {
    "eth0".to_string()
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            gateway: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for log files (stdout only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}
