use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::infrastructure::logging::parse_log_level;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid gate scheme: {0}. Must be http or https")]
    InvalidGateScheme(String),

    #[error("Invalid gate timeout: {0}. Must be at least 1 second")]
    InvalidGateTimeout(u64),

    #[error("Redis endpoint cannot be empty when the redis cache backend is selected")]
    EmptyRedisEndpoint,

    #[error("Invalid memory cache capacity: {0}. Must be at least 1")]
    InvalidCacheCapacity(u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Environment variable prefix; nested keys are separated by `__`,
    /// e.g. `REGISTRY_GATE__TIMEOUT_SECS=10`.
    pub const ENV_PREFIX: &'static str = "REGISTRY_";

    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. cluster-registry.yaml
    /// 3. cluster-registry.local.yaml (optional local overrides)
    /// 4. Environment variables (REGISTRY_* prefix)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("cluster-registry.yaml"))
            .merge(Yaml::file("cluster-registry.local.yaml"))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.database.max_connections));
        }

        if parse_log_level(&config.logging.level).is_err() {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if !matches!(config.gate.scheme.as_str(), "http" | "https") {
            return Err(ConfigError::InvalidGateScheme(config.gate.scheme.clone()));
        }

        if config.gate.timeout_secs == 0 {
            return Err(ConfigError::InvalidGateTimeout(config.gate.timeout_secs));
        }

        if config.cache.backend == crate::domain::models::CacheBackend::Redis
            && config.cache.redis_endpoint.trim().is_empty()
        {
            return Err(ConfigError::EmptyRedisEndpoint);
        }

        if config.cache.memory_capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity(config.cache.memory_capacity));
        }

        Ok(())
    }
}
