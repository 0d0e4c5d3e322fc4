//! Post access: originals, replies, and reposts with per-kind parent
//! counters.

use std::sync::Arc;

use crate::cache::{CacheAside, Grouping};
use crate::domain::error::DomainError;
use crate::domain::posts::{PostKind, PostRecord, validate_post_body, validate_post_parentage};
use crate::domain::types::Page;
use crate::store::{CreatePostParams, PostStore, UpdatePostParams};

use super::error::AccessError;

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
    cache: Arc<CacheAside>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>, cache: Arc<CacheAside>) -> Self {
        Self { store, cache }
    }

    pub async fn get_post(&self, id: &str) -> Result<Option<PostRecord>, AccessError> {
        let store = Arc::clone(&self.store);
        let lookup = id.to_owned();
        let record = self
            .cache
            .read_through(id, move || async move { store.find_by_id(&lookup).await })
            .await?;
        Ok(record)
    }

    /// An author's posts of every kind, newest first.
    pub async fn list_by_author(
        &self,
        author_id: &str,
        page: Page,
    ) -> Result<Vec<PostRecord>, AccessError> {
        let list_store = Arc::clone(&self.store);
        let item_store = Arc::clone(&self.store);
        let owned = author_id.to_owned();
        let records = self
            .cache
            .read_list_through(
                Grouping::posts_of_author(author_id.to_owned()),
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

    /// Reply posts under a parent, oldest first.
    pub async fn list_replies(
        &self,
        parent_post_id: &str,
        page: Page,
    ) -> Result<Vec<PostRecord>, AccessError> {
        let list_store = Arc::clone(&self.store);
        let item_store = Arc::clone(&self.store);
        let owned = parent_post_id.to_owned();
        let records = self
            .cache
            .read_list_through(
                Grouping::posts_of_parent(parent_post_id.to_owned()),
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

    /// Create a post. Replies and reposts must name a live parent, whose
    /// corresponding counter is bumped.
    pub async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, AccessError> {
        validate_post_body(&params.body)?;
        validate_post_parentage(params.kind, params.parent_post_id.as_deref())?;

        let parent = match params.parent_post_id.as_deref() {
            Some(parent_id) => Some(self.live_parent(parent_id).await?),
            None => None,
        };

        let record = self.store.create_post(params).await?;
        self.cache.invalidate(&record).await;

        if let Some(parent) = parent {
            self.bump_parent_counter(&parent.id, record.kind, 1).await?;
        }

        Ok(record)
    }

    /// Author-only body edit; editing an absent or deleted post is a
    /// miss, not an error.
    pub async fn update_post(
        &self,
        id: &str,
        author_id: &str,
        params: UpdatePostParams,
    ) -> Result<Option<PostRecord>, AccessError> {
        validate_post_body(&params.body)?;

        let Some(existing) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        if existing.is_deleted {
            return Ok(None);
        }
        if existing.author_id != author_id {
            return Err(AccessError::forbidden("only the author may edit a post"));
        }

        let Some(updated) = self.store.update_post(id, params).await? else {
            return Ok(None);
        };
        self.cache.invalidate(&updated).await;
        Ok(Some(updated))
    }

    /// Author-only soft delete; `false` when the post is absent or
    /// already deleted. Deleting a reply or repost releases its slot in
    /// the parent's counter.
    pub async fn delete_post(&self, id: &str, author_id: &str) -> Result<bool, AccessError> {
        let Some(existing) = self.store.find_by_id(id).await? else {
            return Ok(false);
        };
        if existing.is_deleted {
            return Ok(false);
        }
        if existing.author_id != author_id {
            return Err(AccessError::forbidden("only the author may delete a post"));
        }

        let Some(deleted) = self.store.soft_delete_post(id).await? else {
            return Ok(false);
        };
        self.cache.invalidate(&deleted).await;

        if let Some(parent_id) = deleted.parent_post_id.as_deref() {
            self.bump_parent_counter(parent_id, deleted.kind, -1).await?;
        }

        Ok(true)
    }

    pub async fn like_post(&self, id: &str) -> Result<Option<PostRecord>, AccessError> {
        self.adjust_likes(id, 1).await
    }

    pub async fn unlike_post(&self, id: &str) -> Result<Option<PostRecord>, AccessError> {
        self.adjust_likes(id, -1).await
    }

    async fn adjust_likes(&self, id: &str, delta: i64) -> Result<Option<PostRecord>, AccessError> {
        let Some(updated) = self.store.adjust_likes(id, delta).await? else {
            return Ok(None);
        };
        self.cache.invalidate(&updated).await;
        Ok(Some(updated))
    }

    async fn bump_parent_counter(
        &self,
        parent_id: &str,
        child_kind: PostKind,
        delta: i64,
    ) -> Result<(), AccessError> {
        let updated = match child_kind {
            PostKind::Reply => self.store.adjust_replies(parent_id, delta).await?,
            PostKind::Repost => self.store.adjust_reposts(parent_id, delta).await?,
            PostKind::Original => None,
        };
        if let Some(parent) = updated {
            self.cache.invalidate(&parent).await;
        }
        Ok(())
    }

    /// Write-path parent lookup, straight from the store.
    async fn live_parent(&self, parent_id: &str) -> Result<PostRecord, AccessError> {
        let parent = self.store.find_by_id(parent_id).await?;
        match parent.filter(|p| !p.is_deleted) {
            Some(parent) => Ok(parent),
            None => Err(DomainError::invariant("parent post does not exist").into()),
        }
    }
}
