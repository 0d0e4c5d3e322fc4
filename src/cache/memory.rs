//! In-process cache backend.
//!
//! Bounded LRU with per-entry expiry. Serves as the default test double
//! and as a real backend for single-process deployments that do not want
//! to operate a Redis instance.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;

use crate::util::lock::rw_write;

use super::client::{CacheClient, CacheError};
use super::config::CacheConfig;

const SOURCE: &str = "cache::memory";

struct MemoryEntry {
    payload: Bytes,
    expires_at: Instant,
}

/// `CacheClient` backed by an in-process LRU map.
pub struct MemoryCache {
    // LruCache::get promotes, so even reads take the write lock.
    entries: RwLock<LruCache<String, MemoryEntry>>,
}

impl MemoryCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.memory_entry_limit_non_zero())),
        }
    }

    /// Number of live entries, counting expired-but-unswept ones.
    pub fn len(&self) -> usize {
        rw_write(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let mut entries = rw_write(&self.entries, SOURCE, "get");
        let now = Instant::now();
        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.payload.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            payload: value,
            expires_at: Instant::now() + ttl,
        };
        rw_write(&self.entries, SOURCE, "set").put(key.to_owned(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        rw_write(&self.entries, SOURCE, "delete").pop(key);
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut entries = rw_write(&self.entries, SOURCE, "delete_by_prefix");
        let matching: Vec<String> = entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        let mut removed = 0;
        for key in matching {
            if entries.pop(&key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_limit(limit: usize) -> MemoryCache {
        MemoryCache::new(&CacheConfig {
            memory_entry_limit: limit,
            ..Default::default()
        })
    }

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = cache_with_limit(16);
        cache
            .set("comment:c-1", Bytes::from_static(b"{}"), TTL)
            .await
            .unwrap();

        let value = cache.get("comment:c-1").await.unwrap();
        assert_eq!(value, Some(Bytes::from_static(b"{}")));
        assert_eq!(cache.get("comment:c-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entries_read_as_absent() {
        let cache = cache_with_limit(16);
        cache
            .set("post:p-1", Bytes::from_static(b"{}"), Duration::from_millis(20))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.get("post:p-1").await.unwrap(), None);
        // The sweep on read also dropped the entry.
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let cache = cache_with_limit(16);
        cache
            .set("post:p-1", Bytes::from_static(b"{}"), TTL)
            .await
            .unwrap();

        cache.delete("post:p-1").await.unwrap();
        cache.delete("post:p-1").await.unwrap();
        assert_eq!(cache.get("post:p-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_by_prefix_scopes_to_matching_keys() {
        let cache = cache_with_limit(16);
        for key in [
            "comment:by_post:p-1:page:1:20",
            "comment:by_post:p-1:page:2:20",
            "comment:by_post:p-2:page:1:20",
            "comment:c-9",
        ] {
            cache.set(key, Bytes::from_static(b"[]"), TTL).await.unwrap();
        }

        let removed = cache
            .delete_by_prefix("comment:by_post:p-1:page:")
            .await
            .unwrap();
        assert_eq!(removed, 2);

        assert_eq!(cache.get("comment:by_post:p-1:page:1:20").await.unwrap(), None);
        assert!(cache.get("comment:by_post:p-2:page:1:20").await.unwrap().is_some());
        assert!(cache.get("comment:c-9").await.unwrap().is_some());

        // Unmatched prefix is a no-op.
        let removed = cache
            .delete_by_prefix("comment:by_post:p-1:page:")
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn capacity_evicts_least_recently_used() {
        let cache = cache_with_limit(2);
        cache.set("a", Bytes::from_static(b"1"), TTL).await.unwrap();
        cache.set("b", Bytes::from_static(b"2"), TTL).await.unwrap();
        // Touch "a" so "b" is the eviction candidate.
        assert!(cache.get("a").await.unwrap().is_some());
        cache.set("c", Bytes::from_static(b"3"), TTL).await.unwrap();

        assert!(cache.get("a").await.unwrap().is_some());
        assert_eq!(cache.get("b").await.unwrap(), None);
        assert!(cache.get("c").await.unwrap().is_some());
    }
}
