//! Tombstone visibility: soft-deleted rows stay in the store but vanish
//! from every service read path, cached or not.

use std::sync::Arc;

use scalo::cache::{CacheAside, CacheConfig, MemoryCache};
use scalo::domain::posts::PostKind;
use scalo::domain::types::Page;
use scalo::service::{CommentService, PostService};
use scalo::store::{CommentStore, CreateCommentParams, CreatePostParams, MemoryStore};

fn aside() -> Arc<CacheAside> {
    let config = CacheConfig::default();
    Arc::new(CacheAside::new(Arc::new(MemoryCache::new(&config)), config))
}

fn comment(post: &str, author: &str, body: &str) -> CreateCommentParams {
    CreateCommentParams {
        post_id: post.to_string(),
        author_id: author.to_string(),
        parent_comment_id: None,
        body: body.to_string(),
    }
}

fn post(author: &str, body: &str) -> CreatePostParams {
    CreatePostParams {
        author_id: author.to_string(),
        body: body.to_string(),
        kind: PostKind::Original,
        parent_post_id: None,
    }
}

#[tokio::test]
async fn deleted_comments_vanish_from_every_read_path() {
    let service = CommentService::new(Arc::new(MemoryStore::new()), aside());

    let created = service
        .create_comment(comment("p1", "ana", "soon gone"))
        .await
        .unwrap();

    // Warm every read path first so the delete has caches to break.
    service.get_comment(&created.id).await.unwrap().unwrap();
    assert_eq!(
        service
            .list_by_post("p1", Page::default())
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        service
            .list_by_author("ana", Page::default())
            .await
            .unwrap()
            .len(),
        1
    );

    assert!(service.delete_comment(&created.id, "ana").await.unwrap());

    assert_eq!(service.get_comment(&created.id).await.unwrap(), None);
    assert!(
        service
            .list_by_post("p1", Page::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        service
            .list_by_author("ana", Page::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn tombstones_outlive_the_service_view() {
    let store = Arc::new(MemoryStore::new());
    let service = CommentService::new(store.clone(), aside());

    let created = service
        .create_comment(comment("p1", "ana", "kept for the record"))
        .await
        .unwrap();
    assert!(service.delete_comment(&created.id, "ana").await.unwrap());

    // The row is still in the store, flagged, for counters and audit.
    let raw = store.find_by_id(&created.id).await.unwrap().unwrap();
    assert!(raw.is_deleted);

    // The service never shows it again, not even on a cold read.
    assert_eq!(service.get_comment(&created.id).await.unwrap(), None);
    assert_eq!(service.get_comment(&created.id).await.unwrap(), None);
}

#[tokio::test]
async fn second_delete_is_a_quiet_no_op() {
    let service = CommentService::new(Arc::new(MemoryStore::new()), aside());

    let parent = service
        .create_comment(comment("p1", "ana", "thread root"))
        .await
        .unwrap();
    let reply = service
        .create_comment(CreateCommentParams {
            post_id: "p1".to_string(),
            author_id: "bruno".to_string(),
            parent_comment_id: Some(parent.id.clone()),
            body: "reply".to_string(),
        })
        .await
        .unwrap();

    assert!(service.delete_comment(&reply.id, "bruno").await.unwrap());
    assert!(!service.delete_comment(&reply.id, "bruno").await.unwrap());

    // The parent's counter came down exactly once.
    let parent_after = service.get_comment(&parent.id).await.unwrap().unwrap();
    assert_eq!(parent_after.replies_count, 0);
}

#[tokio::test]
async fn deleted_posts_vanish_from_feeds_and_reject_likes() {
    let service = PostService::new(Arc::new(MemoryStore::new()), aside());

    let keep = service.create_post(post("ana", "staying up")).await.unwrap();
    let drop = service.create_post(post("ana", "going away")).await.unwrap();

    let feed = service.list_by_author("ana", Page::default()).await.unwrap();
    assert_eq!(feed.len(), 2);

    assert!(service.delete_post(&drop.id, "ana").await.unwrap());

    let feed = service.list_by_author("ana", Page::default()).await.unwrap();
    let ids: Vec<&str> = feed.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![keep.id.as_str()]);

    assert_eq!(service.get_post(&drop.id).await.unwrap(), None);
    // Tombstoned posts take no further engagement.
    assert_eq!(service.like_post(&drop.id).await.unwrap(), None);
}

#[tokio::test]
async fn deleting_a_reply_post_settles_the_parent_counter() {
    let service = PostService::new(Arc::new(MemoryStore::new()), aside());

    let parent = service.create_post(post("ana", "original")).await.unwrap();
    let reply = service
        .create_post(CreatePostParams {
            author_id: "bruno".to_string(),
            body: "replying".to_string(),
            kind: PostKind::Reply,
            parent_post_id: Some(parent.id.clone()),
        })
        .await
        .unwrap();

    let threaded = service.get_post(&parent.id).await.unwrap().unwrap();
    assert_eq!(threaded.replies_count, 1);

    assert!(service.delete_post(&reply.id, "bruno").await.unwrap());

    assert!(
        service
            .list_replies(&parent.id, Page::default())
            .await
            .unwrap()
            .is_empty()
    );
    let parent_after = service.get_post(&parent.id).await.unwrap().unwrap();
    assert_eq!(parent_after.replies_count, 0);
}
