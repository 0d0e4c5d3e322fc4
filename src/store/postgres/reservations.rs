use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::reservations::{ReservationFilter, ReservationRecord, ReservationStatus};
use crate::domain::types::Page;
use crate::store::{
    CreateReservationParams, ReservationStore, StoreError, UpdateReservationParams,
};

use super::{PgStore, bad_enum, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: String,
    user_id: String,
    trip_id: String,
    status: String,
    starts_on: Date,
    ends_on: Date,
    party_size: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl ReservationRow {
    fn into_record(self) -> Result<ReservationRecord, StoreError> {
        let status = ReservationStatus::parse(&self.status)
            .ok_or_else(|| bad_enum("reservation status", &self.status))?;
        Ok(ReservationRecord {
            id: self.id,
            user_id: self.user_id,
            trip_id: self.trip_id,
            status,
            starts_on: self.starts_on,
            ends_on: self.ends_on,
            party_size: self.party_size,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl ReservationStore for PgStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<ReservationRecord>, StoreError> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT id, user_id, trip_id, status, starts_on, ends_on, party_size,
                   created_at, updated_at
            FROM reservations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(ReservationRow::into_record).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        filter: &ReservationFilter,
        page: Page,
    ) -> Result<Vec<ReservationRecord>, StoreError> {
        let rows = if let Some(status) = filter.status {
            sqlx::query_as::<_, ReservationRow>(
                r#"
                SELECT id, user_id, trip_id, status, starts_on, ends_on, party_size,
                       created_at, updated_at
                FROM reservations
                WHERE user_id = $1 AND status = $2
                ORDER BY starts_on DESC, id DESC
                LIMIT $3 OFFSET $4
                "#,
            )
            .bind(user_id)
            .bind(status.as_str())
            .bind(page.size() as i64)
            .bind(page.offset() as i64)
            .fetch_all(self.pool())
            .await
        } else {
            sqlx::query_as::<_, ReservationRow>(
                r#"
                SELECT id, user_id, trip_id, status, starts_on, ends_on, party_size,
                       created_at, updated_at
                FROM reservations
                WHERE user_id = $1
                ORDER BY starts_on DESC, id DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(user_id)
            .bind(page.size() as i64)
            .bind(page.offset() as i64)
            .fetch_all(self.pool())
            .await
        }
        .map_err(map_sqlx_error)?;
        rows.into_iter().map(ReservationRow::into_record).collect()
    }

    async fn create_reservation(
        &self,
        params: CreateReservationParams,
    ) -> Result<ReservationRecord, StoreError> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            INSERT INTO reservations (id, user_id, trip_id, starts_on, ends_on, party_size)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, trip_id, status, starts_on, ends_on, party_size,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&params.user_id)
        .bind(&params.trip_id)
        .bind(params.starts_on)
        .bind(params.ends_on)
        .bind(params.party_size)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.into_record()
    }

    async fn update_reservation(
        &self,
        id: &str,
        params: UpdateReservationParams,
    ) -> Result<Option<ReservationRecord>, StoreError> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            UPDATE reservations
            SET starts_on = COALESCE($2, starts_on),
                ends_on = COALESCE($3, ends_on),
                party_size = COALESCE($4, party_size),
                updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, trip_id, status, starts_on, ends_on, party_size,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(params.starts_on)
        .bind(params.ends_on)
        .bind(params.party_size)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(ReservationRow::into_record).transpose()
    }

    async fn update_reservation_status(
        &self,
        id: &str,
        status: ReservationStatus,
    ) -> Result<Option<ReservationRecord>, StoreError> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            UPDATE reservations
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, trip_id, status, starts_on, ends_on, party_size,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(ReservationRow::into_record).transpose()
    }

    async fn delete_reservation(
        &self,
        id: &str,
    ) -> Result<Option<ReservationRecord>, StoreError> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            DELETE FROM reservations
            WHERE id = $1
            RETURNING id, user_id, trip_id, status, starts_on, ends_on, party_size,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(ReservationRow::into_record).transpose()
    }
}
