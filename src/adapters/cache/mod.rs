//! Key-value cache backends for the record cache.
//!
//! `MemoryCache` keeps entries in-process with moka; `RedisCache` shares
//! them through Redis / KeyDB. Neither expires entries: the registry
//! service invalidates keys on every write.

pub mod memory_cache;
pub mod redis_cache;

pub use memory_cache::MemoryCache;
pub use redis_cache::{RedisCache, RedisSetupError};
