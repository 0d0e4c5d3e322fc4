use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::comments::CommentRecord;
use crate::domain::types::Page;
use crate::store::{CommentStore, CreateCommentParams, StoreError, UpdateCommentParams};

use super::{PgStore, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: String,
    post_id: String,
    author_id: String,
    parent_comment_id: Option<String>,
    body: String,
    likes_count: i64,
    replies_count: i64,
    is_deleted: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            author_id: row.author_id,
            parent_comment_id: row.parent_comment_id,
            body: row.body,
            likes_count: row.likes_count,
            replies_count: row.replies_count,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<CommentRecord>, StoreError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, parent_comment_id, body,
                   likes_count, replies_count, is_deleted, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(CommentRecord::from))
    }

    async fn list_by_post(
        &self,
        post_id: &str,
        page: Page,
    ) -> Result<Vec<CommentRecord>, StoreError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, parent_comment_id, body,
                   likes_count, replies_count, is_deleted, created_at, updated_at
            FROM comments
            WHERE post_id = $1 AND is_deleted = FALSE
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(page.size() as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }

    async fn list_by_author(
        &self,
        author_id: &str,
        page: Page,
    ) -> Result<Vec<CommentRecord>, StoreError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, parent_comment_id, body,
                   likes_count, replies_count, is_deleted, created_at, updated_at
            FROM comments
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
        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }

    async fn list_replies(
        &self,
        parent_comment_id: &str,
        page: Page,
    ) -> Result<Vec<CommentRecord>, StoreError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, parent_comment_id, body,
                   likes_count, replies_count, is_deleted, created_at, updated_at
            FROM comments
            WHERE parent_comment_id = $1 AND is_deleted = FALSE
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(parent_comment_id)
        .bind(page.size() as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }

    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, StoreError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (id, post_id, author_id, parent_comment_id, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, post_id, author_id, parent_comment_id, body,
                      likes_count, replies_count, is_deleted, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&params.post_id)
        .bind(&params.author_id)
        .bind(&params.parent_comment_id)
        .bind(&params.body)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(CommentRecord::from(row))
    }

    async fn update_comment(
        &self,
        id: &str,
        params: UpdateCommentParams,
    ) -> Result<Option<CommentRecord>, StoreError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET body = $2, updated_at = now()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, post_id, author_id, parent_comment_id, body,
                      likes_count, replies_count, is_deleted, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&params.body)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(CommentRecord::from))
    }

    async fn soft_delete_comment(&self, id: &str) -> Result<Option<CommentRecord>, StoreError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET is_deleted = TRUE, updated_at = now()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, post_id, author_id, parent_comment_id, body,
                      likes_count, replies_count, is_deleted, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(CommentRecord::from))
    }

    async fn adjust_likes(
        &self,
        id: &str,
        delta: i64,
    ) -> Result<Option<CommentRecord>, StoreError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET likes_count = GREATEST(likes_count + $2, 0), updated_at = now()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, post_id, author_id, parent_comment_id, body,
                      likes_count, replies_count, is_deleted, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(CommentRecord::from))
    }

    async fn adjust_replies(
        &self,
        id: &str,
        delta: i64,
    ) -> Result<Option<CommentRecord>, StoreError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET replies_count = GREATEST(replies_count + $2, 0), updated_at = now()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, post_id, author_id, parent_comment_id, body,
                      likes_count, replies_count, is_deleted, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(CommentRecord::from))
    }
}
