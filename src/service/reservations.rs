//! Reservation access, scoped to the owning user.
//!
//! Every operation takes the acting user id and refuses to touch another
//! user's reservation. Only the unfiltered listing is cached; a status
//! filter goes straight to the store.

use std::sync::Arc;

use time::OffsetDateTime;

use crate::cache::{CacheAside, Grouping};
use crate::domain::error::DomainError;
use crate::domain::reservations::{
    ReservationFilter, ReservationRecord, ReservationStatus, validate_booking_window,
    validate_party_size, validate_reservation_transition,
};
use crate::domain::types::Page;
use crate::store::{CreateReservationParams, ReservationStore, UpdateReservationParams};

use super::error::AccessError;

#[derive(Clone)]
pub struct ReservationService {
    store: Arc<dyn ReservationStore>,
    cache: Arc<CacheAside>,
}

impl ReservationService {
    pub fn new(store: Arc<dyn ReservationStore>, cache: Arc<CacheAside>) -> Self {
        Self { store, cache }
    }

    /// Read one reservation through the cache; reading someone else's is
    /// `Forbidden`.
    pub async fn get_for_user(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<ReservationRecord>, AccessError> {
        let store = Arc::clone(&self.store);
        let lookup = id.to_owned();
        let record = self
            .cache
            .read_through(id, move || async move { store.find_by_id(&lookup).await })
            .await?;

        let Some(record) = record else {
            return Ok(None);
        };
        if record.user_id != user_id {
            return Err(AccessError::forbidden(
                "reservation belongs to another user",
            ));
        }
        Ok(Some(record))
    }

    /// A user's reservations, most recent start date first.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        filter: ReservationFilter,
        page: Page,
    ) -> Result<Vec<ReservationRecord>, AccessError> {
        if !filter.is_empty() {
            // Filtered listings are read store-direct and never cached.
            return Ok(self.store.list_for_user(user_id, &filter, page).await?);
        }

        let list_store = Arc::clone(&self.store);
        let item_store = Arc::clone(&self.store);
        let owned = user_id.to_owned();
        let records = self
            .cache
            .read_list_through(
                Grouping::reservations_of_user(user_id.to_owned()),
                page,
                move || async move {
                    list_store
                        .list_for_user(&owned, &ReservationFilter::default(), page)
                        .await
                },
                move |id| {
                    let store = Arc::clone(&item_store);
                    async move { store.find_by_id(&id).await }
                },
            )
            .await?;
        Ok(records)
    }

    /// Book a trip; the window and party size are validated against the
    /// current date and new reservations start `pending`.
    pub async fn create_reservation(
        &self,
        params: CreateReservationParams,
    ) -> Result<ReservationRecord, AccessError> {
        let today = OffsetDateTime::now_utc().date();
        validate_booking_window(params.starts_on, params.ends_on, today)?;
        validate_party_size(params.party_size)?;

        let record = self.store.create_reservation(params).await?;
        self.cache.invalidate(&record).await;
        Ok(record)
    }

    /// Owner-only date/party patch; the merged result is re-validated.
    /// Cancelled reservations cannot be modified.
    pub async fn update_reservation(
        &self,
        id: &str,
        user_id: &str,
        params: UpdateReservationParams,
    ) -> Result<Option<ReservationRecord>, AccessError> {
        let Some(existing) = self.owned_by(id, user_id).await? else {
            return Ok(None);
        };
        if existing.status.is_terminal() {
            return Err(
                DomainError::invariant("a cancelled reservation cannot be modified").into(),
            );
        }

        let starts_on = params.starts_on.unwrap_or(existing.starts_on);
        let ends_on = params.ends_on.unwrap_or(existing.ends_on);
        let party_size = params.party_size.unwrap_or(existing.party_size);
        let today = OffsetDateTime::now_utc().date();
        validate_booking_window(starts_on, ends_on, today)?;
        validate_party_size(party_size)?;

        let Some(updated) = self.store.update_reservation(id, params).await? else {
            return Ok(None);
        };
        self.cache.invalidate(&updated).await;
        Ok(Some(updated))
    }

    /// Owner-only status transition; cancellation is terminal.
    pub async fn set_status(
        &self,
        id: &str,
        user_id: &str,
        status: ReservationStatus,
    ) -> Result<Option<ReservationRecord>, AccessError> {
        let Some(existing) = self.owned_by(id, user_id).await? else {
            return Ok(None);
        };
        validate_reservation_transition(existing.status, status)?;

        let Some(updated) = self.store.update_reservation_status(id, status).await? else {
            return Ok(None);
        };
        self.cache.invalidate(&updated).await;
        Ok(Some(updated))
    }

    /// Owner-only physical delete; `false` when already gone.
    pub async fn delete_reservation(&self, id: &str, user_id: &str) -> Result<bool, AccessError> {
        let Some(_) = self.owned_by(id, user_id).await? else {
            return Ok(false);
        };

        let Some(removed) = self.store.delete_reservation(id).await? else {
            return Ok(false);
        };
        self.cache.invalidate(&removed).await;
        Ok(true)
    }

    /// Write-path ownership gate, straight from the store. Absent rows
    /// come back as `None`; rows owned by someone else are `Forbidden`.
    async fn owned_by(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<ReservationRecord>, AccessError> {
        let Some(existing) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        if existing.user_id != user_id {
            return Err(AccessError::forbidden(
                "reservation belongs to another user",
            ));
        }
        Ok(Some(existing))
    }
}
