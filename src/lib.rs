//! Cache-aside data access for a travel community backend.
//!
//! The crate sits between callers and the primary store. Reads go
//! through typed cache keys (single objects, paged id lists, alias
//! lookups); writes land in the store first and then invalidate every
//! key the record can appear under. A cache that errors or stalls is
//! treated as a miss, so the store stays the source of truth.
//!
//! Layers, bottom up: [`domain`] holds the records and their rules,
//! [`store`] the persistence traits plus the memory and Postgres
//! bindings, [`cache`] the key grammar and the read/invalidate
//! protocol, and [`service`] the per-entity operations callers use.

pub mod cache;
pub mod config;
pub mod domain;
pub mod service;
pub mod store;
pub mod telemetry;

mod util;

pub use cache::{CacheAside, CacheClient, CacheConfig, MemoryCache, RedisCache};
pub use config::Settings;
pub use service::{
    AccessError, CommentService, CompanyService, PostService, ReservationService, TripService,
};
pub use store::{MemoryStore, PgStore, StoreError};
