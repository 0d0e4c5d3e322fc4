//! Domain layer: entity records, shared value types, and invariants.

pub mod comments;
pub mod companies;
pub mod error;
pub mod posts;
pub mod reservations;
pub mod trips;
pub mod types;
