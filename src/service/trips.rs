//! Read-only trip access: trips, locations, and itinerary pages arrive
//! from an external scheduling pipeline and are only composed here.

use std::sync::Arc;

use tracing::warn;

use crate::cache::{CacheAside, Grouping};
use crate::domain::trips::{ItineraryItemRecord, LocationRecord, TripDetails, TripRecord};
use crate::domain::types::Page;
use crate::store::TripStore;

use super::error::AccessError;

#[derive(Clone)]
pub struct TripService {
    store: Arc<dyn TripStore>,
    cache: Arc<CacheAside>,
}

impl TripService {
    pub fn new(store: Arc<dyn TripStore>, cache: Arc<CacheAside>) -> Self {
        Self { store, cache }
    }

    pub async fn get_trip(&self, id: &str) -> Result<Option<TripRecord>, AccessError> {
        let store = Arc::clone(&self.store);
        let lookup = id.to_owned();
        let record = self
            .cache
            .read_through(id, move || async move { store.find_trip(&lookup).await })
            .await?;
        Ok(record)
    }

    pub async fn get_location(&self, id: &str) -> Result<Option<LocationRecord>, AccessError> {
        let store = Arc::clone(&self.store);
        let lookup = id.to_owned();
        let record = self
            .cache
            .read_through(id, move || async move { store.find_location(&lookup).await })
            .await?;
        Ok(record)
    }

    /// Itinerary items of a trip in day order.
    pub async fn list_itinerary(
        &self,
        trip_id: &str,
        page: Page,
    ) -> Result<Vec<ItineraryItemRecord>, AccessError> {
        let list_store = Arc::clone(&self.store);
        let item_store = Arc::clone(&self.store);
        let owned = trip_id.to_owned();
        let records = self
            .cache
            .read_list_through(
                Grouping::itinerary_of_trip(trip_id.to_owned()),
                page,
                move || async move { list_store.list_itinerary(&owned, page).await },
                move |id| {
                    let store = Arc::clone(&item_store);
                    async move { store.find_itinerary_item(&id).await }
                },
            )
            .await?;
        Ok(records)
    }

    /// The trip joined with both endpoint locations and one itinerary page.
    ///
    /// The three side reads run concurrently. A location that cannot be
    /// produced leaves its field `None` instead of failing the whole
    /// composition; the itinerary has no such fallback.
    pub async fn trip_details(
        &self,
        id: &str,
        page: Page,
    ) -> Result<Option<TripDetails>, AccessError> {
        let Some(trip) = self.get_trip(id).await? else {
            return Ok(None);
        };

        let (origin, destination, itinerary) = tokio::join!(
            self.get_location(&trip.origin_location_id),
            self.get_location(&trip.destination_location_id),
            self.list_itinerary(id, page),
        );
        let itinerary = itinerary?;

        Ok(Some(TripDetails {
            origin: location_or_none(origin, &trip.origin_location_id),
            destination: location_or_none(destination, &trip.destination_location_id),
            trip,
            itinerary,
        }))
    }
}

fn location_or_none(
    result: Result<Option<LocationRecord>, AccessError>,
    location_id: &str,
) -> Option<LocationRecord> {
    match result {
        Ok(location) => location,
        Err(error) => {
            warn!(location_id, error = %error, "dropping unreadable trip endpoint");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use time::OffsetDateTime;
    use time::macros::date;

    use crate::cache::{CacheConfig, MemoryCache};
    use crate::store::{MemoryStore, StoreError};

    use super::*;

    fn service() -> (TripService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let config = CacheConfig::default();
        let cache = Arc::new(CacheAside::new(
            Arc::new(MemoryCache::new(&config)),
            config,
        ));
        (TripService::new(store.clone(), cache), store)
    }

    fn trip(id: &str, origin: &str, destination: &str) -> TripRecord {
        let now = OffsetDateTime::now_utc();
        TripRecord {
            id: id.to_string(),
            title: "Coast loop".to_string(),
            origin_location_id: origin.to_string(),
            destination_location_id: destination.to_string(),
            starts_on: date!(2026 - 07 - 01),
            ends_on: date!(2026 - 07 - 09),
            created_at: now,
            updated_at: now,
        }
    }

    fn location(id: &str, name: &str) -> LocationRecord {
        LocationRecord {
            id: id.to_string(),
            name: name.to_string(),
            country: "IT".to_string(),
            latitude: 45.4,
            longitude: 9.2,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn itinerary_item(id: &str, trip_id: &str, day: i32) -> ItineraryItemRecord {
        ItineraryItemRecord {
            id: id.to_string(),
            trip_id: trip_id.to_string(),
            location_id: "l-1".to_string(),
            day_number: day,
            activity: format!("day {day}"),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn absent_trip_is_a_miss() {
        let (service, _) = service();
        assert_eq!(service.get_trip("nope").await.unwrap(), None);
        assert!(
            service
                .trip_details("nope", Page::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn itinerary_pages_come_back_in_day_order() {
        let (service, store) = service();
        store.seed_trip(trip("t-1", "l-1", "l-2"));
        for (id, day) in [("i-2", 2), ("i-1", 1), ("i-3", 3)] {
            store.seed_itinerary_item(itinerary_item(id, "t-1", day));
        }

        let items = service
            .list_itinerary("t-1", Page::default())
            .await
            .unwrap();
        let days: Vec<i32> = items.iter().map(|i| i.day_number).collect();
        assert_eq!(days, vec![1, 2, 3]);

        // Second read is served from the cached id list.
        let again = service
            .list_itinerary("t-1", Page::default())
            .await
            .unwrap();
        assert_eq!(again, items);
    }

    #[tokio::test]
    async fn details_compose_trip_endpoints_and_first_page() {
        let (service, store) = service();
        store.seed_trip(trip("t-1", "l-origin", "l-dest"));
        store.seed_location(location("l-origin", "Milan"));
        store.seed_location(location("l-dest", "Palermo"));
        store.seed_itinerary_item(itinerary_item("i-1", "t-1", 1));

        let details = service
            .trip_details("t-1", Page::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(details.trip.id, "t-1");
        assert_eq!(details.origin.unwrap().name, "Milan");
        assert_eq!(details.destination.unwrap().name, "Palermo");
        assert_eq!(details.itinerary.len(), 1);
    }

    #[tokio::test]
    async fn missing_locations_leave_none_fields() {
        let (service, store) = service();
        store.seed_trip(trip("t-1", "l-gone", "l-also-gone"));

        let details = service
            .trip_details("t-1", Page::default())
            .await
            .unwrap()
            .unwrap();
        assert!(details.origin.is_none());
        assert!(details.destination.is_none());
        assert!(details.itinerary.is_empty());
    }

    /// Location reads that error out degrade the same way absent ones do.
    struct BrokenLocations {
        inner: MemoryStore,
    }

    #[async_trait]
    impl TripStore for BrokenLocations {
        async fn find_trip(&self, id: &str) -> Result<Option<TripRecord>, StoreError> {
            self.inner.find_trip(id).await
        }

        async fn find_location(&self, _id: &str) -> Result<Option<LocationRecord>, StoreError> {
            Err(StoreError::Backend("location shard offline".to_string()))
        }

        async fn find_itinerary_item(
            &self,
            id: &str,
        ) -> Result<Option<ItineraryItemRecord>, StoreError> {
            self.inner.find_itinerary_item(id).await
        }

        async fn list_itinerary(
            &self,
            trip_id: &str,
            page: Page,
        ) -> Result<Vec<ItineraryItemRecord>, StoreError> {
            self.inner.list_itinerary(trip_id, page).await
        }
    }

    #[tokio::test]
    async fn failing_location_reads_degrade_to_none() {
        let inner = MemoryStore::new();
        inner.seed_trip(trip("t-1", "l-1", "l-2"));
        inner.seed_itinerary_item(itinerary_item("i-1", "t-1", 1));
        let config = CacheConfig::default();
        let cache = Arc::new(CacheAside::new(
            Arc::new(MemoryCache::new(&config)),
            config,
        ));
        let service = TripService::new(Arc::new(BrokenLocations { inner }), cache);

        let details = service
            .trip_details("t-1", Page::default())
            .await
            .unwrap()
            .unwrap();
        assert!(details.origin.is_none());
        assert!(details.destination.is_none());
        assert_eq!(details.itinerary.len(), 1);
    }
}
