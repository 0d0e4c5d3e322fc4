//! The cache-aside orchestrator.
//!
//! One generic implementation of the read/write-through protocol shared by
//! every entity service:
//!
//! - **Read-by-id**: check the object key; on a hit re-check the tombstone
//!   before returning; on a miss fetch from the store and write through
//!   with the entity TTL. Store misses are NOT cached, so a hot absent id
//!   hits the store every time (the acknowledged stale-negative gap; a
//!   negative TTL would delay read-your-own-create visibility).
//! - **Read-list**: collection keys hold ordered ID lists, never payloads.
//!   A hit rehydrates records through per-id reads; a miss caches the ID
//!   list and writes each fetched record through to its object key.
//! - **Write invalidation**: after a confirmed store write, delete the
//!   object key and every collection prefix matching the record's
//!   groupings. Invalidate, never merge-patch.
//!
//! Every cache call runs under the configured short timeout; failures and
//! timeouts degrade to a miss, are logged, and are counted. Callers never
//! see a cache error.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use futures::future::try_join_all;
use metrics::{counter, histogram};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::domain::types::Page;
use crate::store::StoreError;

use super::client::CacheClient;
use super::config::CacheConfig;
use super::keys::{AliasKey, CollectionKey, CollectionPrefix, EntityKind, Grouping, ObjectKey};

pub(crate) const METRIC_CACHE_HIT_TOTAL: &str = "scalo_cache_hit_total";
pub(crate) const METRIC_CACHE_MISS_TOTAL: &str = "scalo_cache_miss_total";
pub(crate) const METRIC_CACHE_DEGRADED_TOTAL: &str = "scalo_cache_degraded_total";
pub(crate) const METRIC_CACHE_INVALIDATION_TOTAL: &str = "scalo_cache_invalidation_total";
pub(crate) const METRIC_READ_THROUGH_MS: &str = "scalo_read_through_ms";
pub(crate) const METRIC_INVALIDATE_MS: &str = "scalo_invalidate_ms";

/// A record the cache-aside core can manage.
///
/// `groupings` enumerates the collection groupings the record currently
/// belongs to; the write path derives its invalidation scope from this,
/// so it can never disagree with the keys the read path uses.
pub trait Cacheable: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn cache_id(&self) -> &str;

    /// Soft-delete tombstone; kinds without one keep the default.
    fn is_deleted(&self) -> bool {
        false
    }

    fn groupings(&self) -> Vec<Grouping> {
        Vec::new()
    }
}

/// The generic orchestrator. Cheap to share behind an `Arc`; holds the
/// injected cache client and the TTL/timeout policy.
pub struct CacheAside {
    client: Arc<dyn CacheClient>,
    config: CacheConfig,
}

impl CacheAside {
    pub fn new(client: Arc<dyn CacheClient>, config: CacheConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // ========================================================================
    // Read paths
    // ========================================================================

    /// Read one record by id through the cache.
    ///
    /// `fetch` runs only on a cache miss and must query the primary store
    /// by the same id, returning deleted records as-is (the orchestrator
    /// turns them into `None` and leaves them uncached).
    pub async fn read_through<E, F, Fut>(&self, id: &str, fetch: F) -> Result<Option<E>, StoreError>
    where
        E: Cacheable,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<E>, StoreError>> + Send,
    {
        let started = Instant::now();
        let key = ObjectKey::new(E::KIND, id).to_string();

        if let Some(payload) = self.guarded_get(&key).await {
            match serde_json::from_slice::<E>(&payload) {
                Ok(record) => {
                    counter!(METRIC_CACHE_HIT_TOTAL, "entity" => E::KIND.as_str()).increment(1);
                    record_read_latency(started);
                    // A cached tombstone means the entity is gone; no
                    // store round trip.
                    if record.is_deleted() {
                        return Ok(None);
                    }
                    return Ok(Some(record));
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "dropping undecodable cache entry");
                    self.guarded_delete(&key).await;
                }
            }
        }

        counter!(METRIC_CACHE_MISS_TOTAL, "entity" => E::KIND.as_str()).increment(1);
        let fetched = fetch().await?;
        let result = match fetched {
            Some(record) if record.is_deleted() => None,
            Some(record) => {
                self.write_object(&key, &record).await;
                Some(record)
            }
            // Store misses are not cached; see the module docs.
            None => None,
        };
        record_read_latency(started);
        Ok(result)
    }

    /// Read one page of a grouping through the cache.
    ///
    /// `list_fetch` runs on a collection miss and must return the page in
    /// its canonical order with deleted rows already excluded.
    /// `item_fetch` runs per id when a cached ID list is rehydrated and a
    /// member's object key has expired.
    pub async fn read_list_through<E, L, LFut, O, OFut>(
        &self,
        grouping: Grouping,
        page: Page,
        list_fetch: L,
        item_fetch: O,
    ) -> Result<Vec<E>, StoreError>
    where
        E: Cacheable,
        L: FnOnce() -> LFut + Send,
        LFut: Future<Output = Result<Vec<E>, StoreError>> + Send,
        O: Fn(String) -> OFut + Send + Sync,
        OFut: Future<Output = Result<Option<E>, StoreError>> + Send,
    {
        let started = Instant::now();
        let key = CollectionKey::new(E::KIND, grouping, page).to_string();

        if let Some(payload) = self.guarded_get(&key).await {
            match serde_json::from_slice::<Vec<String>>(&payload) {
                Ok(ids) => {
                    counter!(METRIC_CACHE_HIT_TOTAL, "entity" => E::KIND.as_str()).increment(1);
                    let reads = ids.into_iter().map(|id| {
                        let item_fetch = &item_fetch;
                        async move {
                            self.read_through::<E, _, _>(&id, || item_fetch(id.clone())).await
                        }
                    });
                    // Ids whose record vanished or was tombstoned since
                    // the list was cached are silently dropped.
                    let records: Vec<E> = try_join_all(reads)
                        .await?
                        .into_iter()
                        .flatten()
                        .collect();
                    record_read_latency(started);
                    return Ok(records);
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "dropping undecodable cache entry");
                    self.guarded_delete(&key).await;
                }
            }
        }

        counter!(METRIC_CACHE_MISS_TOTAL, "entity" => E::KIND.as_str()).increment(1);
        let records = list_fetch().await?;
        // Stores exclude deleted rows from list queries already; filter
        // again so the guarantee holds for every backend.
        let records: Vec<E> = records.into_iter().filter(|r| !r.is_deleted()).collect();

        let ids: Vec<&str> = records.iter().map(Cacheable::cache_id).collect();
        match serde_json::to_vec(&ids) {
            Ok(payload) => {
                let ttl = self.config.ttl_for(E::KIND);
                self.guarded_set(&key, Bytes::from(payload), ttl).await;
            }
            Err(err) => warn!(key = %key, error = %err, "failed to serialize id list for cache"),
        }
        // The records are already in hand; writing them through now is
        // what makes the hit path's per-id reads warm.
        for record in &records {
            let object_key = ObjectKey::new(E::KIND, record.cache_id()).to_string();
            self.write_object(&object_key, record).await;
        }

        record_read_latency(started);
        Ok(records)
    }

    /// Read one record through a secondary unique key.
    ///
    /// The alias entry caches only the primary id; the record itself lives
    /// under its object key. `resolve` queries the store by the secondary
    /// key on an alias miss; `fetch_by_id` queries by primary id when the
    /// alias is warm but the object key is not.
    pub async fn read_through_alias<E, R, RFut, F, FFut>(
        &self,
        alias: &AliasKey,
        resolve: R,
        fetch_by_id: F,
    ) -> Result<Option<E>, StoreError>
    where
        E: Cacheable,
        R: FnOnce() -> RFut + Send,
        RFut: Future<Output = Result<Option<E>, StoreError>> + Send,
        F: Fn(String) -> FFut + Send + Sync,
        FFut: Future<Output = Result<Option<E>, StoreError>> + Send,
    {
        let alias_key = alias.to_string();

        if let Some(payload) = self.guarded_get(&alias_key).await {
            match std::str::from_utf8(&payload) {
                Ok(id) => {
                    counter!(METRIC_CACHE_HIT_TOTAL, "entity" => E::KIND.as_str()).increment(1);
                    let id = id.to_owned();
                    return self.read_through(&id, || fetch_by_id(id.clone())).await;
                }
                Err(_) => {
                    warn!(key = %alias_key, "dropping undecodable alias entry");
                    self.guarded_delete(&alias_key).await;
                }
            }
        }

        counter!(METRIC_CACHE_MISS_TOTAL, "entity" => E::KIND.as_str()).increment(1);
        match resolve().await? {
            Some(record) if record.is_deleted() => Ok(None),
            Some(record) => {
                let ttl = self.config.ttl_for(E::KIND);
                let id_payload = Bytes::copy_from_slice(record.cache_id().as_bytes());
                self.guarded_set(&alias_key, id_payload, ttl).await;
                let object_key = ObjectKey::new(E::KIND, record.cache_id()).to_string();
                self.write_object(&object_key, &record).await;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    // ========================================================================
    // Write-path invalidation
    // ========================================================================

    /// Full invalidation for one written record: the object key, then
    /// every collection prefix the record's groupings name. Runs only
    /// after the store write has been confirmed.
    pub async fn invalidate<E: Cacheable>(&self, record: &E) {
        let started = Instant::now();
        self.invalidate_object(E::KIND, record.cache_id()).await;
        for grouping in record.groupings() {
            self.invalidate_collections(E::KIND, grouping).await;
        }
        counter!(METRIC_CACHE_INVALIDATION_TOTAL, "entity" => E::KIND.as_str()).increment(1);
        histogram!(METRIC_INVALIDATE_MS).record(started.elapsed().as_secs_f64() * 1000.0);
    }

    /// Delete one object key. Deleting an absent key is a no-op.
    pub async fn invalidate_object(&self, kind: EntityKind, id: &str) {
        let key = ObjectKey::new(kind, id).to_string();
        self.guarded_delete(&key).await;
    }

    /// Delete every cached page of one grouping value.
    pub async fn invalidate_collections(&self, kind: EntityKind, grouping: Grouping) {
        let prefix = CollectionPrefix::new(kind, grouping).to_string();
        let removed = self.guarded_delete_prefix(&prefix).await;
        debug!(prefix = %prefix, removed, "invalidated collection pages");
    }

    /// Delete one alias key.
    pub async fn invalidate_alias(&self, alias: &AliasKey) {
        self.guarded_delete(&alias.to_string()).await;
    }

    // ========================================================================
    // Guarded client calls: short timeout, degrade on failure
    // ========================================================================

    async fn guarded_get(&self, key: &str) -> Option<Bytes> {
        if !self.config.enabled {
            return None;
        }
        match tokio::time::timeout(self.config.op_timeout(), self.client.get(key)).await {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                self.degraded("get", key, &err.to_string());
                None
            }
            Err(_) => {
                self.degraded("get", key, "operation timed out");
                None
            }
        }
    }

    async fn guarded_set(&self, key: &str, payload: Bytes, ttl: std::time::Duration) {
        if !self.config.enabled {
            return;
        }
        match tokio::time::timeout(self.config.op_timeout(), self.client.set(key, payload, ttl))
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => self.degraded("set", key, &err.to_string()),
            Err(_) => self.degraded("set", key, "operation timed out"),
        }
    }

    async fn guarded_delete(&self, key: &str) {
        if !self.config.enabled {
            return;
        }
        match tokio::time::timeout(self.config.op_timeout(), self.client.delete(key)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => self.degraded("delete", key, &err.to_string()),
            Err(_) => self.degraded("delete", key, "operation timed out"),
        }
    }

    async fn guarded_delete_prefix(&self, prefix: &str) -> u64 {
        if !self.config.enabled {
            return 0;
        }
        match tokio::time::timeout(
            self.config.op_timeout(),
            self.client.delete_by_prefix(prefix),
        )
        .await
        {
            Ok(Ok(removed)) => removed,
            Ok(Err(err)) => {
                self.degraded("delete_by_prefix", prefix, &err.to_string());
                0
            }
            Err(_) => {
                self.degraded("delete_by_prefix", prefix, "operation timed out");
                0
            }
        }
    }

    async fn write_object<E: Cacheable>(&self, key: &str, record: &E) {
        match serde_json::to_vec(record) {
            Ok(payload) => {
                let ttl = self.config.ttl_for(E::KIND);
                self.guarded_set(key, Bytes::from(payload), ttl).await;
            }
            Err(err) => warn!(key, error = %err, "failed to serialize record for cache"),
        }
    }

    fn degraded(&self, op: &'static str, key: &str, error: &str) {
        counter!(METRIC_CACHE_DEGRADED_TOTAL, "op" => op).increment(1);
        warn!(op, key, error, "cache degraded; continuing store-only");
    }
}

fn record_read_latency(started: Instant) {
    histogram!(METRIC_READ_THROUGH_MS).record(started.elapsed().as_secs_f64() * 1000.0);
}

// ============================================================================
// Cacheable impls for the domain records
// ============================================================================

use crate::domain::comments::CommentRecord;
use crate::domain::companies::CompanyRecord;
use crate::domain::posts::PostRecord;
use crate::domain::reservations::ReservationRecord;
use crate::domain::trips::{ItineraryItemRecord, LocationRecord, TripRecord};

impl Cacheable for CommentRecord {
    const KIND: EntityKind = EntityKind::Comment;

    fn cache_id(&self) -> &str {
        &self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn groupings(&self) -> Vec<Grouping> {
        let mut groupings = vec![
            Grouping::comments_of_post(self.post_id.clone()),
            Grouping::comments_of_author(self.author_id.clone()),
        ];
        if let Some(parent) = &self.parent_comment_id {
            groupings.push(Grouping::replies_of_comment(parent.clone()));
        }
        groupings
    }
}

impl Cacheable for PostRecord {
    const KIND: EntityKind = EntityKind::Post;

    fn cache_id(&self) -> &str {
        &self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn groupings(&self) -> Vec<Grouping> {
        let mut groupings = vec![Grouping::posts_of_author(self.author_id.clone())];
        if let Some(parent) = &self.parent_post_id {
            groupings.push(Grouping::posts_of_parent(parent.clone()));
        }
        groupings
    }
}

impl Cacheable for CompanyRecord {
    const KIND: EntityKind = EntityKind::Company;

    fn cache_id(&self) -> &str {
        &self.id
    }

    fn groupings(&self) -> Vec<Grouping> {
        vec![Grouping::companies_of_status(self.status.as_str())]
    }
}

impl Cacheable for ReservationRecord {
    const KIND: EntityKind = EntityKind::Reservation;

    fn cache_id(&self) -> &str {
        &self.id
    }

    fn groupings(&self) -> Vec<Grouping> {
        vec![Grouping::reservations_of_user(self.user_id.clone())]
    }
}

impl Cacheable for TripRecord {
    const KIND: EntityKind = EntityKind::Trip;

    fn cache_id(&self) -> &str {
        &self.id
    }
}

impl Cacheable for LocationRecord {
    const KIND: EntityKind = EntityKind::Location;

    fn cache_id(&self) -> &str {
        &self.id
    }
}

impl Cacheable for ItineraryItemRecord {
    const KIND: EntityKind = EntityKind::ItineraryItem;

    fn cache_id(&self) -> &str {
        &self.id
    }

    fn groupings(&self) -> Vec<Grouping> {
        vec![Grouping::itinerary_of_trip(self.trip_id.clone())]
    }
}
