//! Comment access: single-level threads under posts, author-scoped edits,
//! like counters.

use std::sync::Arc;

use crate::cache::{CacheAside, Grouping};
use crate::domain::comments::{CommentRecord, validate_comment_body};
use crate::domain::error::DomainError;
use crate::domain::types::Page;
use crate::store::{CommentStore, CreateCommentParams, UpdateCommentParams};

use super::error::AccessError;

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn CommentStore>,
    cache: Arc<CacheAside>,
}

impl CommentService {
    pub fn new(store: Arc<dyn CommentStore>, cache: Arc<CacheAside>) -> Self {
        Self { store, cache }
    }

    pub async fn get_comment(&self, id: &str) -> Result<Option<CommentRecord>, AccessError> {
        let store = Arc::clone(&self.store);
        let lookup = id.to_owned();
        let record = self
            .cache
            .read_through(id, move || async move { store.find_by_id(&lookup).await })
            .await?;
        Ok(record)
    }

    /// Comments under a post, newest first.
    pub async fn list_by_post(
        &self,
        post_id: &str,
        page: Page,
    ) -> Result<Vec<CommentRecord>, AccessError> {
        let list_store = Arc::clone(&self.store);
        let item_store = Arc::clone(&self.store);
        let owned = post_id.to_owned();
        let records = self
            .cache
            .read_list_through(
                Grouping::comments_of_post(post_id.to_owned()),
                page,
                move || async move { list_store.list_by_post(&owned, page).await },
                move |id| {
                    let store = Arc::clone(&item_store);
                    async move { store.find_by_id(&id).await }
                },
            )
            .await?;
        Ok(records)
    }

    /// A user's comments across posts, newest first.
    pub async fn list_by_author(
        &self,
        author_id: &str,
        page: Page,
    ) -> Result<Vec<CommentRecord>, AccessError> {
        let list_store = Arc::clone(&self.store);
        let item_store = Arc::clone(&self.store);
        let owned = author_id.to_owned();
        let records = self
            .cache
            .read_list_through(
                Grouping::comments_of_author(author_id.to_owned()),
                page,
                move || async move { list_store.list_by_author(&owned, page).await },
                move |id| {
                    let store = Arc::clone(&item_store);
                    async move { store.find_by_id(&id).await }
                },
            )
            .await?;
        Ok(records)
    }

    /// Replies under a comment, oldest first.
    pub async fn list_replies(
        &self,
        parent_comment_id: &str,
        page: Page,
    ) -> Result<Vec<CommentRecord>, AccessError> {
        let list_store = Arc::clone(&self.store);
        let item_store = Arc::clone(&self.store);
        let owned = parent_comment_id.to_owned();
        let records = self
            .cache
            .read_list_through(
                Grouping::replies_of_comment(parent_comment_id.to_owned()),
                page,
                move || async move { list_store.list_replies(&owned, page).await },
                move |id| {
                    let store = Arc::clone(&item_store);
                    async move { store.find_by_id(&id).await }
                },
            )
            .await?;
        Ok(records)
    }

    /// Create a comment. A reply must name a parent that exists, is not
    /// deleted, sits on the same post, and is not itself a reply.
    pub async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, AccessError> {
        validate_comment_body(&params.body)?;

        let parent = match params.parent_comment_id.as_deref() {
            Some(parent_id) => Some(self.live_parent(parent_id, &params.post_id).await?),
            None => None,
        };

        let record = self.store.create_comment(params).await?;
        self.cache.invalidate(&record).await;

        if let Some(parent) = parent {
            if let Some(updated) = self.store.adjust_replies(&parent.id, 1).await? {
                self.cache.invalidate(&updated).await;
            }
        }

        Ok(record)
    }

    /// Author-only body edit; editing an absent or deleted comment is a
    /// miss, not an error.
    pub async fn update_comment(
        &self,
        id: &str,
        author_id: &str,
        params: UpdateCommentParams,
    ) -> Result<Option<CommentRecord>, AccessError> {
        validate_comment_body(&params.body)?;

        let Some(existing) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        if existing.is_deleted {
            return Ok(None);
        }
        if existing.author_id != author_id {
            return Err(AccessError::forbidden("only the author may edit a comment"));
        }

        let Some(updated) = self.store.update_comment(id, params).await? else {
            return Ok(None);
        };
        self.cache.invalidate(&updated).await;
        Ok(Some(updated))
    }

    /// Author-only soft delete; `false` when the comment is absent or
    /// already deleted.
    pub async fn delete_comment(&self, id: &str, author_id: &str) -> Result<bool, AccessError> {
        let Some(existing) = self.store.find_by_id(id).await? else {
            return Ok(false);
        };
        if existing.is_deleted {
            return Ok(false);
        }
        if existing.author_id != author_id {
            return Err(AccessError::forbidden(
                "only the author may delete a comment",
            ));
        }

        let Some(deleted) = self.store.soft_delete_comment(id).await? else {
            return Ok(false);
        };
        self.cache.invalidate(&deleted).await;

        if let Some(parent_id) = deleted.parent_comment_id.as_deref() {
            if let Some(parent) = self.store.adjust_replies(parent_id, -1).await? {
                self.cache.invalidate(&parent).await;
            }
        }

        Ok(true)
    }

    pub async fn like_comment(&self, id: &str) -> Result<Option<CommentRecord>, AccessError> {
        self.adjust_likes(id, 1).await
    }

    pub async fn unlike_comment(&self, id: &str) -> Result<Option<CommentRecord>, AccessError> {
        self.adjust_likes(id, -1).await
    }

    async fn adjust_likes(
        &self,
        id: &str,
        delta: i64,
    ) -> Result<Option<CommentRecord>, AccessError> {
        let Some(updated) = self.store.adjust_likes(id, delta).await? else {
            return Ok(None);
        };
        self.cache.invalidate(&updated).await;
        Ok(Some(updated))
    }

    /// Write-path parent lookup, straight from the store.
    async fn live_parent(
        &self,
        parent_id: &str,
        post_id: &str,
    ) -> Result<CommentRecord, AccessError> {
        let parent = self.store.find_by_id(parent_id).await?;
        let Some(parent) = parent.filter(|p| !p.is_deleted) else {
            return Err(DomainError::invariant("parent comment does not exist").into());
        };
        if parent.post_id != post_id {
            return Err(
                DomainError::invariant("parent comment belongs to a different post").into(),
            );
        }
        if parent.parent_comment_id.is_some() {
            return Err(DomainError::invariant("replies cannot be nested").into());
        }
        Ok(parent)
    }
}
