use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::posts::{PostKind, PostRecord};
use crate::domain::types::Page;
use crate::store::{CreatePostParams, PostStore, StoreError, UpdatePostParams};

use super::{PgStore, bad_enum, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct PostRow {
    id: String,
    author_id: String,
    body: String,
    kind: String,
    parent_post_id: Option<String>,
    likes_count: i64,
    replies_count: i64,
    reposts_count: i64,
    is_deleted: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl PostRow {
    fn into_record(self) -> Result<PostRecord, StoreError> {
        let kind = PostKind::parse(&self.kind).ok_or_else(|| bad_enum("post kind", &self.kind))?;
        Ok(PostRecord {
            id: self.id,
            author_id: self.author_id,
            body: self.body,
            kind,
            parent_post_id: self.parent_post_id,
            likes_count: self.likes_count,
            replies_count: self.replies_count,
            reposts_count: self.reposts_count,
            is_deleted: self.is_deleted,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn into_records(rows: Vec<PostRow>) -> Result<Vec<PostRecord>, StoreError> {
    rows.into_iter().map(PostRow::into_record).collect()
}

#[async_trait]
impl PostStore for PgStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<PostRecord>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author_id, body, kind, parent_post_id,
                   likes_count, replies_count, reposts_count, is_deleted,
                   created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(PostRow::into_record).transpose()
    }

    async fn list_by_author(
        &self,
        author_id: &str,
        page: Page,
    ) -> Result<Vec<PostRecord>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author_id, body, kind, parent_post_id,
                   likes_count, replies_count, reposts_count, is_deleted,
                   created_at, updated_at
            FROM posts
            WHERE author_id = $1 AND is_deleted = FALSE
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(author_id)
        .bind(page.size() as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        into_records(rows)
    }

    async fn list_replies(
        &self,
        parent_post_id: &str,
        page: Page,
    ) -> Result<Vec<PostRecord>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author_id, body, kind, parent_post_id,
                   likes_count, replies_count, reposts_count, is_deleted,
                   created_at, updated_at
            FROM posts
            WHERE parent_post_id = $1 AND kind = 'reply' AND is_deleted = FALSE
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(parent_post_id)
        .bind(page.size() as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        into_records(rows)
    }

    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, author_id, body, kind, parent_post_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, author_id, body, kind, parent_post_id,
                      likes_count, replies_count, reposts_count, is_deleted,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&params.author_id)
        .bind(&params.body)
        .bind(params.kind.as_str())
        .bind(&params.parent_post_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.into_record()
    }

    async fn update_post(
        &self,
        id: &str,
        params: UpdatePostParams,
    ) -> Result<Option<PostRecord>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET body = $2, updated_at = now()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, author_id, body, kind, parent_post_id,
                      likes_count, replies_count, reposts_count, is_deleted,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&params.body)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(PostRow::into_record).transpose()
    }

    async fn soft_delete_post(&self, id: &str) -> Result<Option<PostRecord>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET is_deleted = TRUE, updated_at = now()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, author_id, body, kind, parent_post_id,
                      likes_count, replies_count, reposts_count, is_deleted,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(PostRow::into_record).transpose()
    }

    async fn adjust_likes(&self, id: &str, delta: i64) -> Result<Option<PostRecord>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET likes_count = GREATEST(likes_count + $2, 0), updated_at = now()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, author_id, body, kind, parent_post_id,
                      likes_count, replies_count, reposts_count, is_deleted,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(PostRow::into_record).transpose()
    }

    async fn adjust_replies(
        &self,
        id: &str,
        delta: i64,
    ) -> Result<Option<PostRecord>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET replies_count = GREATEST(replies_count + $2, 0), updated_at = now()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, author_id, body, kind, parent_post_id,
                      likes_count, replies_count, reposts_count, is_deleted,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(PostRow::into_record).transpose()
    }

    async fn adjust_reposts(
        &self,
        id: &str,
        delta: i64,
    ) -> Result<Option<PostRecord>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET reposts_count = GREATEST(reposts_count + $2, 0), updated_at = now()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, author_id, body, kind, parent_post_id,
                      likes_count, replies_count, reposts_count, is_deleted,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        row.map(PostRow::into_record).transpose()
    }
}
