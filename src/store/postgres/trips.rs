use async_trait::async_trait;
use time::{Date, OffsetDateTime};

use crate::domain::trips::{ItineraryItemRecord, LocationRecord, TripRecord};
use crate::domain::types::Page;
use crate::store::{StoreError, TripStore};

use super::{PgStore, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct TripRow {
    id: String,
    title: String,
    origin_location_id: String,
    destination_location_id: String,
    starts_on: Date,
    ends_on: Date,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<TripRow> for TripRecord {
    fn from(row: TripRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            origin_location_id: row.origin_location_id,
            destination_location_id: row.destination_location_id,
            starts_on: row.starts_on,
            ends_on: row.ends_on,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LocationRow {
    id: String,
    name: String,
    country: String,
    latitude: f64,
    longitude: f64,
    created_at: OffsetDateTime,
}

impl From<LocationRow> for LocationRecord {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            country: row.country,
            latitude: row.latitude,
            longitude: row.longitude,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItineraryItemRow {
    id: String,
    trip_id: String,
    location_id: String,
    day_number: i32,
    activity: String,
    created_at: OffsetDateTime,
}

impl From<ItineraryItemRow> for ItineraryItemRecord {
    fn from(row: ItineraryItemRow) -> Self {
        Self {
            id: row.id,
            trip_id: row.trip_id,
            location_id: row.location_id,
            day_number: row.day_number,
            activity: row.activity,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl TripStore for PgStore {
    async fn find_trip(&self, id: &str) -> Result<Option<TripRecord>, StoreError> {
        let row = sqlx::query_as::<_, TripRow>(
            r#"
            SELECT id, title, origin_location_id, destination_location_id,
                   starts_on, ends_on, created_at, updated_at
            FROM trips
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(TripRecord::from))
    }

    async fn find_location(&self, id: &str) -> Result<Option<LocationRecord>, StoreError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT id, name, country, latitude, longitude, created_at
            FROM locations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(LocationRecord::from))
    }

    async fn find_itinerary_item(
        &self,
        id: &str,
    ) -> Result<Option<ItineraryItemRecord>, StoreError> {
        let row = sqlx::query_as::<_, ItineraryItemRow>(
            r#"
            SELECT id, trip_id, location_id, day_number, activity, created_at
            FROM itinerary_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(ItineraryItemRecord::from))
    }

    async fn list_itinerary(
        &self,
        trip_id: &str,
        page: Page,
    ) -> Result<Vec<ItineraryItemRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ItineraryItemRow>(
            r#"
            SELECT id, trip_id, location_id, day_number, activity, created_at
            FROM itinerary_items
            WHERE trip_id = $1
            ORDER BY day_number ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(trip_id)
        .bind(page.size() as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(ItineraryItemRecord::from).collect())
    }
}
