//! Persistence traits and the store bindings behind them.
//!
//! Absence is typed, not thrown: lookups return `Ok(None)` and deletes
//! report whether a row was removed. `StoreError` is reserved for
//! infrastructure failures and constraint violations.

use async_trait::async_trait;
use thiserror::Error;
use time::Date;

use crate::domain::comments::CommentRecord;
use crate::domain::companies::{CompanyRecord, CompanyStatus};
use crate::domain::posts::{PostKind, PostRecord};
use crate::domain::reservations::{ReservationFilter, ReservationRecord, ReservationStatus};
use crate::domain::trips::{ItineraryItemRecord, LocationRecord, TripRecord};
use crate::domain::types::Page;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store error: {0}")]
    Backend(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("store timeout")]
    Timeout,
}

impl StoreError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateCommentParams {
    pub post_id: String,
    pub author_id: String,
    pub parent_comment_id: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCommentParams {
    pub body: String,
}

/// Comment persistence. `find_by_id` returns soft-deleted rows as-is so
/// callers can tell a tombstone from a miss; list queries exclude them.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<CommentRecord>, StoreError>;

    /// Newest first.
    async fn list_by_post(
        &self,
        post_id: &str,
        page: Page,
    ) -> Result<Vec<CommentRecord>, StoreError>;

    /// Newest first.
    async fn list_by_author(
        &self,
        author_id: &str,
        page: Page,
    ) -> Result<Vec<CommentRecord>, StoreError>;

    /// Oldest first, thread order.
    async fn list_replies(
        &self,
        parent_comment_id: &str,
        page: Page,
    ) -> Result<Vec<CommentRecord>, StoreError>;

    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, StoreError>;

    /// `None` when the comment is absent or already deleted.
    async fn update_comment(
        &self,
        id: &str,
        params: UpdateCommentParams,
    ) -> Result<Option<CommentRecord>, StoreError>;

    /// Tombstones the row and returns it; `None` when absent or already
    /// deleted, which makes the operation idempotent.
    async fn soft_delete_comment(&self, id: &str) -> Result<Option<CommentRecord>, StoreError>;

    /// Adjusts `likes_count` by `delta`, clamped at zero.
    async fn adjust_likes(&self, id: &str, delta: i64)
    -> Result<Option<CommentRecord>, StoreError>;

    /// Adjusts `replies_count` by `delta`, clamped at zero.
    async fn adjust_replies(
        &self,
        id: &str,
        delta: i64,
    ) -> Result<Option<CommentRecord>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub author_id: String,
    pub body: String,
    pub kind: PostKind,
    pub parent_post_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub body: String,
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<PostRecord>, StoreError>;

    /// Newest first.
    async fn list_by_author(
        &self,
        author_id: &str,
        page: Page,
    ) -> Result<Vec<PostRecord>, StoreError>;

    /// Reply posts under a parent, oldest first.
    async fn list_replies(
        &self,
        parent_post_id: &str,
        page: Page,
    ) -> Result<Vec<PostRecord>, StoreError>;

    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, StoreError>;

    async fn update_post(
        &self,
        id: &str,
        params: UpdatePostParams,
    ) -> Result<Option<PostRecord>, StoreError>;

    async fn soft_delete_post(&self, id: &str) -> Result<Option<PostRecord>, StoreError>;

    async fn adjust_likes(&self, id: &str, delta: i64) -> Result<Option<PostRecord>, StoreError>;

    async fn adjust_replies(&self, id: &str, delta: i64)
    -> Result<Option<PostRecord>, StoreError>;

    async fn adjust_reposts(&self, id: &str, delta: i64)
    -> Result<Option<PostRecord>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct CreateCompanyParams {
    pub registry_id: String,
    pub name: String,
    pub city: Option<String>,
}

/// Profile patch; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCompanyParams {
    pub name: Option<String>,
    pub city: Option<String>,
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<CompanyRecord>, StoreError>;

    async fn find_by_registry(
        &self,
        registry_id: &str,
    ) -> Result<Option<CompanyRecord>, StoreError>;

    /// Name order.
    async fn list_by_status(
        &self,
        status: CompanyStatus,
        page: Page,
    ) -> Result<Vec<CompanyRecord>, StoreError>;

    /// New companies start `pending`. A registry id clash is
    /// `StoreError::Duplicate`.
    async fn create_company(
        &self,
        params: CreateCompanyParams,
    ) -> Result<CompanyRecord, StoreError>;

    async fn update_company(
        &self,
        id: &str,
        params: UpdateCompanyParams,
    ) -> Result<Option<CompanyRecord>, StoreError>;

    /// Sets the status and returns the previous one alongside the updated
    /// record, so callers can invalidate both status listings.
    async fn update_company_status(
        &self,
        id: &str,
        status: CompanyStatus,
    ) -> Result<Option<(CompanyStatus, CompanyRecord)>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct CreateReservationParams {
    pub user_id: String,
    pub trip_id: String,
    pub starts_on: Date,
    pub ends_on: Date,
    pub party_size: i32,
}

/// Date/party patch; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateReservationParams {
    pub starts_on: Option<Date>,
    pub ends_on: Option<Date>,
    pub party_size: Option<i32>,
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<ReservationRecord>, StoreError>;

    /// Start date, most recent first.
    async fn list_for_user(
        &self,
        user_id: &str,
        filter: &ReservationFilter,
        page: Page,
    ) -> Result<Vec<ReservationRecord>, StoreError>;

    /// New reservations start `pending`.
    async fn create_reservation(
        &self,
        params: CreateReservationParams,
    ) -> Result<ReservationRecord, StoreError>;

    async fn update_reservation(
        &self,
        id: &str,
        params: UpdateReservationParams,
    ) -> Result<Option<ReservationRecord>, StoreError>;

    async fn update_reservation_status(
        &self,
        id: &str,
        status: ReservationStatus,
    ) -> Result<Option<ReservationRecord>, StoreError>;

    /// Physical removal; returns the removed record.
    async fn delete_reservation(&self, id: &str)
    -> Result<Option<ReservationRecord>, StoreError>;
}

/// Trip data is written by an ingestion pipeline elsewhere; this side
/// only reads.
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn find_trip(&self, id: &str) -> Result<Option<TripRecord>, StoreError>;

    async fn find_location(&self, id: &str) -> Result<Option<LocationRecord>, StoreError>;

    async fn find_itinerary_item(
        &self,
        id: &str,
    ) -> Result<Option<ItineraryItemRecord>, StoreError>;

    /// Day order.
    async fn list_itinerary(
        &self,
        trip_id: &str,
        page: Page,
    ) -> Result<Vec<ItineraryItemRecord>, StoreError>;
}
