//! Cache subsystem: typed keys, pluggable backends, and the cache-aside
//! orchestrator shared by every entity service.

pub mod aside;
pub mod client;
pub mod config;
pub mod keys;
pub mod memory;
pub mod redis;

pub use aside::{CacheAside, Cacheable};
pub use client::{CacheClient, CacheError};
pub use config::CacheConfig;
pub use keys::{AliasKey, CollectionKey, CollectionPrefix, EntityKind, Grouping, ObjectKey};
pub use memory::MemoryCache;
pub use self::redis::RedisCache;
