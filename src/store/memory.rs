//! In-memory store binding backed by `DashMap`.
//!
//! The default binding for tests and single-process runs. Timestamps are
//! strictly monotonic per store instance so time-ordered listings are
//! total even when rows are created within one clock tick.

use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::domain::comments::CommentRecord;
use crate::domain::companies::{CompanyRecord, CompanyStatus};
use crate::domain::posts::{PostKind, PostRecord};
use crate::domain::reservations::{ReservationFilter, ReservationRecord, ReservationStatus};
use crate::domain::trips::{ItineraryItemRecord, LocationRecord, TripRecord};
use crate::domain::types::Page;
use crate::util::lock::mutex_lock;

use super::{
    CommentStore, CompanyStore, CreateCommentParams, CreateCompanyParams, CreatePostParams,
    CreateReservationParams, PostStore, ReservationStore, StoreError, TripStore,
    UpdateCommentParams, UpdateCompanyParams, UpdatePostParams, UpdateReservationParams,
};

const SOURCE: &str = "store::memory";

const COMPANIES_REGISTRY_KEY: &str = "companies_registry_id_key";

pub struct MemoryStore {
    comments: DashMap<String, CommentRecord>,
    posts: DashMap<String, PostRecord>,
    companies: DashMap<String, CompanyRecord>,
    // registry_id -> company id, the unique secondary index
    registry_index: DashMap<String, String>,
    reservations: DashMap<String, ReservationRecord>,
    trips: DashMap<String, TripRecord>,
    locations: DashMap<String, LocationRecord>,
    itinerary: DashMap<String, ItineraryItemRecord>,
    clock: Mutex<OffsetDateTime>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            comments: DashMap::new(),
            posts: DashMap::new(),
            companies: DashMap::new(),
            registry_index: DashMap::new(),
            reservations: DashMap::new(),
            trips: DashMap::new(),
            locations: DashMap::new(),
            itinerary: DashMap::new(),
            clock: Mutex::new(OffsetDateTime::now_utc()),
        }
    }

    /// Next write timestamp, strictly greater than every previous one.
    /// Always called before taking a map reference so the clock mutex
    /// never nests inside a shard lock.
    fn next_timestamp(&self) -> OffsetDateTime {
        let mut last = mutex_lock(&self.clock, SOURCE, "next_timestamp");
        let mut now = OffsetDateTime::now_utc();
        if now <= *last {
            now = *last + Duration::nanoseconds(1);
        }
        *last = now;
        now
    }

    // ========================================================================
    // Seeding for the externally-written trip data
    // ========================================================================

    pub fn seed_trip(&self, trip: TripRecord) {
        self.trips.insert(trip.id.clone(), trip);
    }

    pub fn seed_location(&self, location: LocationRecord) {
        self.locations.insert(location.id.clone(), location);
    }

    pub fn seed_itinerary_item(&self, item: ItineraryItemRecord) {
        self.itinerary.insert(item.id.clone(), item);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn page_slice<T>(rows: Vec<T>, page: Page) -> Vec<T> {
    rows.into_iter()
        .skip(page.offset() as usize)
        .take(page.size() as usize)
        .collect()
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<CommentRecord>, StoreError> {
        Ok(self.comments.get(id).map(|entry| entry.clone()))
    }

    async fn list_by_post(
        &self,
        post_id: &str,
        page: Page,
    ) -> Result<Vec<CommentRecord>, StoreError> {
        let mut rows: Vec<CommentRecord> = self
            .comments
            .iter()
            .filter(|entry| entry.post_id == post_id && !entry.is_deleted)
            .map(|entry| entry.clone())
            .collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(page_slice(rows, page))
    }

    async fn list_by_author(
        &self,
        author_id: &str,
        page: Page,
    ) -> Result<Vec<CommentRecord>, StoreError> {
        let mut rows: Vec<CommentRecord> = self
            .comments
            .iter()
            .filter(|entry| entry.author_id == author_id && !entry.is_deleted)
            .map(|entry| entry.clone())
            .collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(page_slice(rows, page))
    }

    async fn list_replies(
        &self,
        parent_comment_id: &str,
        page: Page,
    ) -> Result<Vec<CommentRecord>, StoreError> {
        let mut rows: Vec<CommentRecord> = self
            .comments
            .iter()
            .filter(|entry| {
                entry.parent_comment_id.as_deref() == Some(parent_comment_id) && !entry.is_deleted
            })
            .map(|entry| entry.clone())
            .collect();
        rows.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(page_slice(rows, page))
    }

    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, StoreError> {
        let now = self.next_timestamp();
        let record = CommentRecord {
            id: new_id(),
            post_id: params.post_id,
            author_id: params.author_id,
            parent_comment_id: params.parent_comment_id,
            body: params.body,
            likes_count: 0,
            replies_count: 0,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        self.comments.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update_comment(
        &self,
        id: &str,
        params: UpdateCommentParams,
    ) -> Result<Option<CommentRecord>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.comments.get_mut(id) else {
            return Ok(None);
        };
        if entry.is_deleted {
            return Ok(None);
        }
        entry.body = params.body;
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }

    async fn soft_delete_comment(&self, id: &str) -> Result<Option<CommentRecord>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.comments.get_mut(id) else {
            return Ok(None);
        };
        if entry.is_deleted {
            return Ok(None);
        }
        entry.is_deleted = true;
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }

    async fn adjust_likes(
        &self,
        id: &str,
        delta: i64,
    ) -> Result<Option<CommentRecord>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.comments.get_mut(id) else {
            return Ok(None);
        };
        if entry.is_deleted {
            return Ok(None);
        }
        entry.likes_count = (entry.likes_count + delta).max(0);
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }

    async fn adjust_replies(
        &self,
        id: &str,
        delta: i64,
    ) -> Result<Option<CommentRecord>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.comments.get_mut(id) else {
            return Ok(None);
        };
        if entry.is_deleted {
            return Ok(None);
        }
        entry.replies_count = (entry.replies_count + delta).max(0);
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<PostRecord>, StoreError> {
        Ok(self.posts.get(id).map(|entry| entry.clone()))
    }

    async fn list_by_author(
        &self,
        author_id: &str,
        page: Page,
    ) -> Result<Vec<PostRecord>, StoreError> {
        let mut rows: Vec<PostRecord> = self
            .posts
            .iter()
            .filter(|entry| entry.author_id == author_id && !entry.is_deleted)
            .map(|entry| entry.clone())
            .collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(page_slice(rows, page))
    }

    async fn list_replies(
        &self,
        parent_post_id: &str,
        page: Page,
    ) -> Result<Vec<PostRecord>, StoreError> {
        let mut rows: Vec<PostRecord> = self
            .posts
            .iter()
            .filter(|entry| {
                entry.parent_post_id.as_deref() == Some(parent_post_id)
                    && entry.kind == PostKind::Reply
                    && !entry.is_deleted
            })
            .map(|entry| entry.clone())
            .collect();
        rows.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(page_slice(rows, page))
    }

    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, StoreError> {
        let now = self.next_timestamp();
        let record = PostRecord {
            id: new_id(),
            author_id: params.author_id,
            body: params.body,
            kind: params.kind,
            parent_post_id: params.parent_post_id,
            likes_count: 0,
            replies_count: 0,
            reposts_count: 0,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update_post(
        &self,
        id: &str,
        params: UpdatePostParams,
    ) -> Result<Option<PostRecord>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.posts.get_mut(id) else {
            return Ok(None);
        };
        if entry.is_deleted {
            return Ok(None);
        }
        entry.body = params.body;
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }

    async fn soft_delete_post(&self, id: &str) -> Result<Option<PostRecord>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.posts.get_mut(id) else {
            return Ok(None);
        };
        if entry.is_deleted {
            return Ok(None);
        }
        entry.is_deleted = true;
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }

    async fn adjust_likes(&self, id: &str, delta: i64) -> Result<Option<PostRecord>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.posts.get_mut(id) else {
            return Ok(None);
        };
        if entry.is_deleted {
            return Ok(None);
        }
        entry.likes_count = (entry.likes_count + delta).max(0);
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }

    async fn adjust_replies(
        &self,
        id: &str,
        delta: i64,
    ) -> Result<Option<PostRecord>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.posts.get_mut(id) else {
            return Ok(None);
        };
        if entry.is_deleted {
            return Ok(None);
        }
        entry.replies_count = (entry.replies_count + delta).max(0);
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }

    async fn adjust_reposts(
        &self,
        id: &str,
        delta: i64,
    ) -> Result<Option<PostRecord>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.posts.get_mut(id) else {
            return Ok(None);
        };
        if entry.is_deleted {
            return Ok(None);
        }
        entry.reposts_count = (entry.reposts_count + delta).max(0);
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<CompanyRecord>, StoreError> {
        Ok(self.companies.get(id).map(|entry| entry.clone()))
    }

    async fn find_by_registry(
        &self,
        registry_id: &str,
    ) -> Result<Option<CompanyRecord>, StoreError> {
        let Some(id) = self.registry_index.get(registry_id).map(|e| e.clone()) else {
            return Ok(None);
        };
        Ok(self.companies.get(&id).map(|entry| entry.clone()))
    }

    async fn list_by_status(
        &self,
        status: CompanyStatus,
        page: Page,
    ) -> Result<Vec<CompanyRecord>, StoreError> {
        let mut rows: Vec<CompanyRecord> = self
            .companies
            .iter()
            .filter(|entry| entry.status == status)
            .map(|entry| entry.clone())
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(page_slice(rows, page))
    }

    async fn create_company(
        &self,
        params: CreateCompanyParams,
    ) -> Result<CompanyRecord, StoreError> {
        let now = self.next_timestamp();
        let id = new_id();
        match self.registry_index.entry(params.registry_id.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Duplicate {
                    constraint: COMPANIES_REGISTRY_KEY.to_string(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }
        let record = CompanyRecord {
            id,
            registry_id: params.registry_id,
            name: params.name,
            status: CompanyStatus::Pending,
            city: params.city,
            created_at: now,
            updated_at: now,
        };
        self.companies.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update_company(
        &self,
        id: &str,
        params: UpdateCompanyParams,
    ) -> Result<Option<CompanyRecord>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.companies.get_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = params.name {
            entry.name = name;
        }
        if let Some(city) = params.city {
            entry.city = Some(city);
        }
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }

    async fn update_company_status(
        &self,
        id: &str,
        status: CompanyStatus,
    ) -> Result<Option<(CompanyStatus, CompanyRecord)>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.companies.get_mut(id) else {
            return Ok(None);
        };
        let previous = entry.status;
        entry.status = status;
        entry.updated_at = now;
        Ok(Some((previous, entry.clone())))
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<ReservationRecord>, StoreError> {
        Ok(self.reservations.get(id).map(|entry| entry.clone()))
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        filter: &ReservationFilter,
        page: Page,
    ) -> Result<Vec<ReservationRecord>, StoreError> {
        let mut rows: Vec<ReservationRecord> = self
            .reservations
            .iter()
            .filter(|entry| {
                entry.user_id == user_id
                    && filter.status.is_none_or(|status| entry.status == status)
            })
            .map(|entry| entry.clone())
            .collect();
        rows.sort_by(|a, b| b.starts_on.cmp(&a.starts_on).then_with(|| b.id.cmp(&a.id)));
        Ok(page_slice(rows, page))
    }

    async fn create_reservation(
        &self,
        params: CreateReservationParams,
    ) -> Result<ReservationRecord, StoreError> {
        let now = self.next_timestamp();
        let record = ReservationRecord {
            id: new_id(),
            user_id: params.user_id,
            trip_id: params.trip_id,
            status: ReservationStatus::Pending,
            starts_on: params.starts_on,
            ends_on: params.ends_on,
            party_size: params.party_size,
            created_at: now,
            updated_at: now,
        };
        self.reservations.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update_reservation(
        &self,
        id: &str,
        params: UpdateReservationParams,
    ) -> Result<Option<ReservationRecord>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.reservations.get_mut(id) else {
            return Ok(None);
        };
        if let Some(starts_on) = params.starts_on {
            entry.starts_on = starts_on;
        }
        if let Some(ends_on) = params.ends_on {
            entry.ends_on = ends_on;
        }
        if let Some(party_size) = params.party_size {
            entry.party_size = party_size;
        }
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }

    async fn update_reservation_status(
        &self,
        id: &str,
        status: ReservationStatus,
    ) -> Result<Option<ReservationRecord>, StoreError> {
        let now = self.next_timestamp();
        let Some(mut entry) = self.reservations.get_mut(id) else {
            return Ok(None);
        };
        entry.status = status;
        entry.updated_at = now;
        Ok(Some(entry.clone()))
    }

    async fn delete_reservation(
        &self,
        id: &str,
    ) -> Result<Option<ReservationRecord>, StoreError> {
        Ok(self.reservations.remove(id).map(|(_, record)| record))
    }
}

#[async_trait]
impl TripStore for MemoryStore {
    async fn find_trip(&self, id: &str) -> Result<Option<TripRecord>, StoreError> {
        Ok(self.trips.get(id).map(|entry| entry.clone()))
    }

    async fn find_location(&self, id: &str) -> Result<Option<LocationRecord>, StoreError> {
        Ok(self.locations.get(id).map(|entry| entry.clone()))
    }

    async fn find_itinerary_item(
        &self,
        id: &str,
    ) -> Result<Option<ItineraryItemRecord>, StoreError> {
        Ok(self.itinerary.get(id).map(|entry| entry.clone()))
    }

    async fn list_itinerary(
        &self,
        trip_id: &str,
        page: Page,
    ) -> Result<Vec<ItineraryItemRecord>, StoreError> {
        let mut rows: Vec<ItineraryItemRecord> = self
            .itinerary
            .iter()
            .filter(|entry| entry.trip_id == trip_id)
            .map(|entry| entry.clone())
            .collect();
        rows.sort_by(|a, b| {
            a.day_number
                .cmp(&b.day_number)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(page_slice(rows, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment_params(post: &str, author: &str, body: &str) -> CreateCommentParams {
        CreateCommentParams {
            post_id: post.to_string(),
            author_id: author.to_string(),
            parent_comment_id: None,
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn timestamps_are_strictly_monotonic() {
        let store = MemoryStore::new();
        let first = store
            .create_comment(comment_params("p-1", "u-1", "one"))
            .await
            .unwrap();
        let second = store
            .create_comment(comment_params("p-1", "u-1", "two"))
            .await
            .unwrap();
        assert!(second.created_at > first.created_at);
    }

    #[tokio::test]
    async fn list_by_post_pages_newest_first() {
        let store = MemoryStore::new();
        for body in ["one", "two", "three"] {
            store
                .create_comment(comment_params("p-1", "u-1", body))
                .await
                .unwrap();
        }
        store
            .create_comment(comment_params("p-other", "u-1", "elsewhere"))
            .await
            .unwrap();

        let first_page = store.list_by_post("p-1", Page::new(1, 2)).await.unwrap();
        let bodies: Vec<&str> = first_page.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, vec!["three", "two"]);

        let second_page = store.list_by_post("p-1", Page::new(2, 2)).await.unwrap();
        let bodies: Vec<&str> = second_page.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, vec!["one"]);
    }

    #[tokio::test]
    async fn soft_delete_is_idempotent_and_hides_from_lists() {
        let store = MemoryStore::new();
        let comment = store
            .create_comment(comment_params("p-1", "u-1", "doomed"))
            .await
            .unwrap();

        let deleted = store.soft_delete_comment(&comment.id).await.unwrap();
        assert!(deleted.is_some_and(|c| c.is_deleted));
        assert!(store.soft_delete_comment(&comment.id).await.unwrap().is_none());

        assert!(store.list_by_post("p-1", Page::default()).await.unwrap().is_empty());
        // The tombstone is still visible to direct lookup.
        let found = CommentStore::find_by_id(&store, &comment.id).await.unwrap();
        assert!(found.is_some_and(|c| c.is_deleted));
    }

    #[tokio::test]
    async fn like_counter_is_floored_at_zero() {
        let store = MemoryStore::new();
        let comment = store
            .create_comment(comment_params("p-1", "u-1", "liked"))
            .await
            .unwrap();

        let bumped = CommentStore::adjust_likes(&store, &comment.id, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bumped.likes_count, 1);
        let floored = CommentStore::adjust_likes(&store, &comment.id, -5)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(floored.likes_count, 0);
    }

    #[tokio::test]
    async fn duplicate_registry_id_is_rejected() {
        let store = MemoryStore::new();
        let params = CreateCompanyParams {
            registry_id: "REG-1".to_string(),
            name: "Acme".to_string(),
            city: None,
        };
        store.create_company(params.clone()).await.unwrap();

        let err = store.create_company(params).await.unwrap_err();
        match err {
            StoreError::Duplicate { constraint } => {
                assert_eq!(constraint, COMPANIES_REGISTRY_KEY);
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn company_status_update_reports_previous_status() {
        let store = MemoryStore::new();
        let company = store
            .create_company(CreateCompanyParams {
                registry_id: "REG-1".to_string(),
                name: "Acme".to_string(),
                city: Some("Torino".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(company.status, CompanyStatus::Pending);

        let (previous, updated) = store
            .update_company_status(&company.id, CompanyStatus::Active)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(previous, CompanyStatus::Pending);
        assert_eq!(updated.status, CompanyStatus::Active);
    }

    #[tokio::test]
    async fn reservation_listing_honors_status_filter() {
        let store = MemoryStore::new();
        let first = store
            .create_reservation(CreateReservationParams {
                user_id: "u-1".to_string(),
                trip_id: "t-1".to_string(),
                starts_on: time::macros::date!(2026 - 09 - 01),
                ends_on: time::macros::date!(2026 - 09 - 05),
                party_size: 2,
            })
            .await
            .unwrap();
        store
            .create_reservation(CreateReservationParams {
                user_id: "u-1".to_string(),
                trip_id: "t-2".to_string(),
                starts_on: time::macros::date!(2026 - 10 - 01),
                ends_on: time::macros::date!(2026 - 10 - 02),
                party_size: 4,
            })
            .await
            .unwrap();
        store
            .update_reservation_status(&first.id, ReservationStatus::Confirmed)
            .await
            .unwrap();

        let all = store
            .list_for_user("u-1", &ReservationFilter::default(), Page::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        // Most recent start date first.
        assert_eq!(all[0].trip_id, "t-2");

        let confirmed = store
            .list_for_user(
                "u-1",
                &ReservationFilter {
                    status: Some(ReservationStatus::Confirmed),
                },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].id, first.id);
    }

    #[tokio::test]
    async fn reservation_delete_is_physical() {
        let store = MemoryStore::new();
        let reservation = store
            .create_reservation(CreateReservationParams {
                user_id: "u-1".to_string(),
                trip_id: "t-1".to_string(),
                starts_on: time::macros::date!(2026 - 09 - 01),
                ends_on: time::macros::date!(2026 - 09 - 05),
                party_size: 2,
            })
            .await
            .unwrap();

        assert!(store.delete_reservation(&reservation.id).await.unwrap().is_some());
        assert!(store.delete_reservation(&reservation.id).await.unwrap().is_none());
        let found = ReservationStore::find_by_id(&store, &reservation.id)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn itinerary_lists_in_day_order() {
        let store = MemoryStore::new();
        let now = OffsetDateTime::now_utc();
        for (id, day) in [("i-3", 3), ("i-1", 1), ("i-2", 2)] {
            store.seed_itinerary_item(ItineraryItemRecord {
                id: id.to_string(),
                trip_id: "t-1".to_string(),
                location_id: "l-1".to_string(),
                day_number: day,
                activity: format!("day {day}"),
                created_at: now,
            });
        }

        let items = store.list_itinerary("t-1", Page::default()).await.unwrap();
        let days: Vec<i32> = items.iter().map(|i| i.day_number).collect();
        assert_eq!(days, vec![1, 2, 3]);
    }
}
