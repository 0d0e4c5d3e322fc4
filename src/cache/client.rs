//! The fast-path cache seam.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

impl CacheError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

/// A key-value cache with TTL expiry and prefix-scoped bulk delete.
///
/// Pure I/O: implementations carry no application logic and no knowledge
/// of entity types or key shapes. Callers never see a `CacheError`; the
/// orchestrator converts every failure into a miss.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Fetch a value; `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    /// Store a value under `key` for at most `ttl`.
    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError>;

    /// Remove a single key. Removing an absent key is a no-op.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Remove every key starting with `prefix`, returning how many were
    /// removed. An unmatched prefix is a no-op returning zero.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError>;
}
