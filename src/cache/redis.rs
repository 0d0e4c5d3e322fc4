//! Redis cache backend.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use super::client::{CacheClient, CacheError};
use super::config::CacheConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
const CONNECT_RETRIES: usize = 1;
const SCAN_BATCH: usize = 100;

/// `CacheClient` backed by a shared Redis connection manager.
///
/// The manager multiplexes one connection and reconnects on its own; the
/// retry and timeout budget is kept tight because the orchestrator treats
/// any slow or failed call as a miss anyway.
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str, config: &CacheConfig) -> Result<Self, CacheError> {
        let manager_config = ConnectionManagerConfig::new()
            .set_number_of_retries(CONNECT_RETRIES)
            .set_connection_timeout(CONNECT_TIMEOUT)
            .set_response_timeout(config.op_timeout());

        let client = Client::open(url).map_err(CacheError::backend)?;
        let manager = client
            .get_connection_manager_with_config(manager_config)
            .await
            .map_err(CacheError::backend)?;

        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheClient for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let mut conn = self.manager.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(CacheError::backend)?;
        Ok(value.map(Bytes::from))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let payload: &[u8] = value.as_ref();
        // SETEX rejects a zero expiry; sub-second TTLs round up.
        let seconds = ttl.as_secs().max(1);
        let _: () = conn
            .set_ex(key, payload, seconds)
            .await
            .map_err(CacheError::backend)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let _: u64 = conn.del(key).await.map_err(CacheError::backend)?;
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        // Key segments come from the typed builder and contain no glob
        // metacharacters, so appending `*` is safe.
        let pattern = format!("{prefix}*");
        let mut conn = self.manager.clone();
        let mut cursor: u64 = 0;
        let mut removed: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(CacheError::backend)?;
            if !keys.is_empty() {
                let count: u64 = redis::cmd("DEL")
                    .arg(&keys)
                    .query_async(&mut conn)
                    .await
                    .map_err(CacheError::backend)?;
                removed += count;
            }
            cursor = next;
            if cursor == 0 {
                break;
            }
        }
        Ok(removed)
    }
}
