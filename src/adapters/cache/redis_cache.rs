//! Redis / KeyDB backed key-value cache.
//!
//! Builds a [`fred::clients::Pool`] for the endpoint described in
//! [`CacheConfig`], optionally over TLS, with the password read from the
//! environment variable named in the config. Keys are written without
//! expiry.

use async_trait::async_trait;
use fred::clients::Pool;
use fred::interfaces::{ClientLike, KeysInterface};
use fred::types::config::{ReconnectPolicy, ServerConfig, TlsConnector};
use fred::types::Builder;
use thiserror::Error;
use tracing::trace;

use crate::domain::errors::{RegistryError, RegistryResult};
use crate::domain::models::CacheConfig;
use crate::domain::ports::KeyValueCache;

const POOL_SIZE: usize = 4;

#[derive(Debug, Error)]
pub enum RedisSetupError {
    #[error("Invalid port in endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Redis client error: {0}")]
    Client(#[from] fred::error::Error),
}

/// `KeyValueCache` over a shared Redis instance.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    pub const fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Connect to the configured endpoint and verify it with a PING.
    pub async fn connect(config: &CacheConfig) -> Result<Self, RedisSetupError> {
        let password = std::env::var(&config.redis_password_env).ok();

        let endpoint = config
            .redis_endpoint
            .trim_start_matches("rediss://")
            .trim_start_matches("redis://");
        let (host, port) = parse_host_port(endpoint)?;

        let mut fred_config = fred::types::config::Config {
            server: ServerConfig::new_centralized(host, port),
            ..fred::types::config::Config::default()
        };
        if config.redis_tls {
            fred_config.tls = Some(TlsConnector::default_rustls()?.into());
        }
        fred_config.password = password;

        let mut builder = Builder::from_config(fred_config);
        builder.set_policy(ReconnectPolicy::new_exponential(0, 100, 30_000, 2));

        let pool = builder.build_pool(POOL_SIZE)?;
        pool.init().await?;
        let _: String = pool.ping(None).await?;

        tracing::info!(host, port, tls = config.redis_tls, pool_size = POOL_SIZE, "redis cache connected");
        Ok(Self::new(pool))
    }
}

fn unavailable(err: &fred::error::Error) -> RegistryError {
    RegistryError::CacheUnavailable(err.to_string())
}

#[async_trait]
impl KeyValueCache for RedisCache {
    async fn get(&self, key: &str) -> RegistryResult<Option<Vec<u8>>> {
        let value: Option<String> = self.pool.get(key).await.map_err(|e| unavailable(&e))?;
        trace!(key, hit = value.is_some(), "redis GET");
        Ok(value.map(String::into_bytes))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> RegistryResult<()> {
        // Cached values are JSON, so they always travel as UTF-8 strings.
        let value = String::from_utf8(value)
            .map_err(|e| RegistryError::SerializationError(e.to_string()))?;
        let _: () = self
            .pool
            .set(key, value, None, None, false)
            .await
            .map_err(|e| unavailable(&e))?;
        trace!(key, "redis SET");
        Ok(())
    }

    async fn delete(&self, key: &str) -> RegistryResult<()> {
        let removed: i64 = self.pool.del(key).await.map_err(|e| unavailable(&e))?;
        trace!(key, removed, "redis DEL");
        Ok(())
    }
}

/// Parse a `host:port` string. If the port is omitted, defaults to `6379`.
pub fn parse_host_port(endpoint: &str) -> Result<(&str, u16), RedisSetupError> {
    let endpoint = endpoint.split('/').next().unwrap_or(endpoint);

    match endpoint.rsplit_once(':') {
        Some((host, port_str)) => {
            let port = port_str
                .parse()
                .map_err(|_| RedisSetupError::InvalidEndpoint(endpoint.to_string()))?;
            Ok((host, port))
        }
        None => Ok((endpoint, 6379)),
    }
}
