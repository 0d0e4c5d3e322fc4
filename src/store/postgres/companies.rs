use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::companies::{CompanyRecord, CompanyStatus};
use crate::domain::types::Page;
use crate::store::{CompanyStore, CreateCompanyParams, StoreError, UpdateCompanyParams};

use super::{PgStore, bad_enum, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct CompanyRow {
    id: String,
    registry_id: String,
    name: String,
    status: String,
    city: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl CompanyRow {
    fn into_record(self) -> Result<CompanyRecord, StoreError> {
        let status = CompanyStatus::parse(&self.status)
            .ok_or_else(|| bad_enum("company status", &self.status))?;
        Ok(CompanyRecord {
            id: self.id,
            registry_id: self.registry_id,
            name: self.name,
            status,
            city: self.city,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// `update_company_status` returns the row plus the pre-update status,
/// carried out of the statement through a CTE.
#[derive(sqlx::FromRow)]
struct CompanyStatusChangeRow {
    id: String,
    registry_id: String,
    name: String,
    status: String,
    city: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    previous_status: String,
}

#[async_trait]
impl CompanyStore for PgStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<CompanyRecord>, StoreError> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, registry_id, name, status, city, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(CompanyRow::into_record).transpose()
    }

    async fn find_by_registry(
        &self,
        registry_id: &str,
    ) -> Result<Option<CompanyRecord>, StoreError> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, registry_id, name, status, city, created_at, updated_at
            FROM companies
            WHERE registry_id = $1
            "#,
        )
        .bind(registry_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(CompanyRow::into_record).transpose()
    }

    async fn list_by_status(
        &self,
        status: CompanyStatus,
        page: Page,
    ) -> Result<Vec<CompanyRecord>, StoreError> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, registry_id, name, status, city, created_at, updated_at
            FROM companies
            WHERE status = $1
            ORDER BY name ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status.as_str())
        .bind(page.size() as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        rows.into_iter().map(CompanyRow::into_record).collect()
    }

    async fn create_company(
        &self,
        params: CreateCompanyParams,
    ) -> Result<CompanyRecord, StoreError> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            INSERT INTO companies (id, registry_id, name, city)
            VALUES ($1, $2, $3, $4)
            RETURNING id, registry_id, name, status, city, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&params.registry_id)
        .bind(&params.name)
        .bind(&params.city)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.into_record()
    }

    async fn update_company(
        &self,
        id: &str,
        params: UpdateCompanyParams,
    ) -> Result<Option<CompanyRecord>, StoreError> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            UPDATE companies
            SET name = COALESCE($2, name),
                city = COALESCE($3, city),
                updated_at = now()
            WHERE id = $1
            RETURNING id, registry_id, name, status, city, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&params.name)
        .bind(&params.city)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(CompanyRow::into_record).transpose()
    }

    async fn update_company_status(
        &self,
        id: &str,
        status: CompanyStatus,
    ) -> Result<Option<(CompanyStatus, CompanyRecord)>, StoreError> {
        let row = sqlx::query_as::<_, CompanyStatusChangeRow>(
            r#"
            WITH previous AS (
                SELECT status FROM companies WHERE id = $1
            )
            UPDATE companies
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, registry_id, name, status, city, created_at, updated_at,
                      (SELECT status FROM previous) AS previous_status
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let previous = CompanyStatus::parse(&row.previous_status)
            .ok_or_else(|| bad_enum("company status", &row.previous_status))?;
        let record = CompanyRow {
            id: row.id,
            registry_id: row.registry_id,
            name: row.name,
            status: row.status,
            city: row.city,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
        .into_record()?;
        Ok(Some((previous, record)))
    }
}
