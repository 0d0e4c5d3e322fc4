//! Cache configuration.
//!
//! Controls the fast-path cache: per-entity TTLs, the per-operation
//! timeout, and the in-memory backend's capacity.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

use super::keys::EntityKind;

// Default values for cache configuration
const DEFAULT_OP_TIMEOUT_MS: u64 = 250;
const DEFAULT_COMMENT_TTL_SECS: u64 = 3600;
const DEFAULT_POST_TTL_SECS: u64 = 1800;
const DEFAULT_COMPANY_TTL_SECS: u64 = 3600;
const DEFAULT_RESERVATION_TTL_SECS: u64 = 1800;
const DEFAULT_TRIP_TTL_SECS: u64 = 300;
const DEFAULT_MEMORY_ENTRY_LIMIT: usize = 4096;

/// Cache configuration, embeddable in any host application's settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Master switch; when false every read goes straight to the store.
    pub enabled: bool,
    /// Budget for a single cache operation. Must stay well under the
    /// surrounding request deadline so a degraded cache never makes the
    /// system slower than running without one.
    pub op_timeout_ms: u64,
    /// TTL for comment objects and comment ID lists.
    pub comment_ttl_secs: u64,
    /// TTL for post objects and post ID lists.
    pub post_ttl_secs: u64,
    /// TTL for company objects, registry aliases, and status lists.
    pub company_ttl_secs: u64,
    /// TTL for reservation objects and per-user lists.
    pub reservation_ttl_secs: u64,
    /// TTL for trips, locations, and itinerary pages.
    pub trip_ttl_secs: u64,
    /// Maximum entries held by the in-memory cache backend.
    pub memory_entry_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            op_timeout_ms: DEFAULT_OP_TIMEOUT_MS,
            comment_ttl_secs: DEFAULT_COMMENT_TTL_SECS,
            post_ttl_secs: DEFAULT_POST_TTL_SECS,
            company_ttl_secs: DEFAULT_COMPANY_TTL_SECS,
            reservation_ttl_secs: DEFAULT_RESERVATION_TTL_SECS,
            trip_ttl_secs: DEFAULT_TRIP_TTL_SECS,
            memory_entry_limit: DEFAULT_MEMORY_ENTRY_LIMIT,
        }
    }
}

impl CacheConfig {
    /// Per-operation timeout as a `Duration`, clamping zero to 1 ms.
    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms.max(1))
    }

    /// TTL for the given entity kind, clamping zero to one second.
    ///
    /// Locations and itinerary items share the trip TTL; they are written
    /// by the same pipeline and staleness tolerances match.
    pub fn ttl_for(&self, kind: EntityKind) -> Duration {
        let secs = match kind {
            EntityKind::Comment => self.comment_ttl_secs,
            EntityKind::Post => self.post_ttl_secs,
            EntityKind::Company => self.company_ttl_secs,
            EntityKind::Reservation => self.reservation_ttl_secs,
            EntityKind::Trip | EntityKind::Location | EntityKind::ItineraryItem => {
                self.trip_ttl_secs
            }
        };
        Duration::from_secs(secs.max(1))
    }

    /// Returns the memory entry limit as NonZeroUsize, clamping to 1 if zero.
    pub fn memory_entry_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.memory_entry_limit).unwrap_or(NonZeroUsize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.op_timeout_ms, 250);
        assert_eq!(config.comment_ttl_secs, 3600);
        assert_eq!(config.post_ttl_secs, 1800);
        assert_eq!(config.company_ttl_secs, 3600);
        assert_eq!(config.reservation_ttl_secs, 1800);
        assert_eq!(config.trip_ttl_secs, 300);
        assert_eq!(config.memory_entry_limit, 4096);
    }

    #[test]
    fn ttl_maps_by_entity_kind() {
        let config = CacheConfig::default();
        assert_eq!(
            config.ttl_for(EntityKind::Comment),
            Duration::from_secs(3600)
        );
        assert_eq!(config.ttl_for(EntityKind::Post), Duration::from_secs(1800));
        assert_eq!(config.ttl_for(EntityKind::Trip), Duration::from_secs(300));
        assert_eq!(
            config.ttl_for(EntityKind::Location),
            Duration::from_secs(300)
        );
        assert_eq!(
            config.ttl_for(EntityKind::ItineraryItem),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn zero_ttl_clamps_to_one_second() {
        let config = CacheConfig {
            comment_ttl_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.ttl_for(EntityKind::Comment), Duration::from_secs(1));
    }

    #[test]
    fn zero_timeout_clamps_to_one_milli() {
        let config = CacheConfig {
            op_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.op_timeout(), Duration::from_millis(1));
    }

    #[test]
    fn entry_limit_clamps_to_min() {
        let config = CacheConfig {
            memory_entry_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.memory_entry_limit_non_zero().get(), 1);
    }
}
