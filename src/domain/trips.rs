//! Trip, location, and itinerary records.
//!
//! Trip data is produced by an external scheduling pipeline; this crate
//! only reads it, so there are no create/update inputs here.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// A scheduled trip as persisted by the primary store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: String,
    pub title: String,
    pub origin_location_id: String,
    pub destination_location_id: String,
    pub starts_on: Date,
    pub ends_on: Date,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A geographic location referenced by trips and itinerary items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: String,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: OffsetDateTime,
}

/// One scheduled stop of a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItemRecord {
    pub id: String,
    pub trip_id: String,
    pub location_id: String,
    /// 1-based day within the trip; itinerary listings order by this.
    pub day_number: i32,
    pub activity: String,
    pub created_at: OffsetDateTime,
}

/// A trip joined with its endpoints and the first page of its itinerary.
///
/// Locations degrade to `None` when their records are missing rather than
/// failing the whole composition.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDetails {
    pub trip: TripRecord,
    pub origin: Option<LocationRecord>,
    pub destination: Option<LocationRecord>,
    pub itinerary: Vec<ItineraryItemRecord>,
}
