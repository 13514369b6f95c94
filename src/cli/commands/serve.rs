//! Implementation of the `cluster-registry serve` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::cache::{MemoryCache, RedisCache};
use crate::adapters::http::{ObjectsHttpConfig, ObjectsHttpServer};
use crate::adapters::sqlite::{database_url, initialize_database, PoolConfig, SqliteRegistryStore};
use crate::domain::models::{CacheBackend, CacheConfig, Config};
use crate::domain::ports::KeyValueCache;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::gate::ClusterGate;
use crate::infrastructure::logging::LoggerImpl;
use crate::infrastructure::trust::GatewayTrust;
use crate::services::RegistryService;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Configuration file; defaults to cluster-registry.yaml plus local overrides
    #[arg(short, long, env = "REGISTRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(
        short,
        long,
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log: Option<String>,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let mut config = match args.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(level) = args.log {
        config.logging.level = level;
    }

    let _logger = LoggerImpl::init(&config.logging).context("Failed to initialize logging")?;

    let service = build_service(&config).await?;
    let server = ObjectsHttpServer::new(service, ObjectsHttpConfig::from(&config.server));

    server
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server failed: {e}"))?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// Wire the store, cache, gate and trust predicate into a service.
pub async fn build_service(config: &Config) -> Result<RegistryService> {
    let pool = initialize_database(
        &database_url(&config.database.path),
        Some(PoolConfig::from(&config.database)),
    )
    .await
    .context("Failed to initialize database")?;

    let cache = build_cache(&config.cache).await?;
    let gate = ClusterGate::new(&config.gate).context("Failed to build cluster gate client")?;
    let trust = GatewayTrust::from_config(&config.trust);

    tracing::info!(
        database = %config.database.path,
        cache = ?config.cache.backend,
        "registry service ready"
    );

    Ok(RegistryService::new(
        Arc::new(SqliteRegistryStore::new(pool)),
        Arc::new(gate),
        cache,
        Arc::new(trust),
    ))
}

async fn build_cache(config: &CacheConfig) -> Result<Arc<dyn KeyValueCache>> {
    match config.backend {
        CacheBackend::Memory => Ok(Arc::new(MemoryCache::with_capacity(config.memory_capacity))),
        CacheBackend::Redis => {
            let cache = RedisCache::connect(config)
                .await
                .with_context(|| format!("Failed to connect to redis at {}", config.redis_endpoint))?;
            Ok(Arc::new(cache))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
