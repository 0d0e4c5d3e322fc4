//! Every instrumented cache path lands in the metrics registry under its
//! own name.
//!
//! `DebuggingRecorder::install` claims the process-global recorder, so
//! this binary holds a single test that walks all the paths.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use metrics_util::debugging::DebuggingRecorder;
use scalo::cache::{CacheAside, CacheClient, CacheConfig, CacheError, MemoryCache};
use scalo::domain::types::Page;
use scalo::service::CommentService;
use scalo::store::{CreateCommentParams, MemoryStore, UpdateCommentParams};

struct DownCache;

#[async_trait]
impl CacheClient for DownCache {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>, CacheError> {
        Err(CacheError::backend("connection refused"))
    }

    async fn set(&self, _key: &str, _value: Bytes, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::backend("connection refused"))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::backend("connection refused"))
    }

    async fn delete_by_prefix(&self, _prefix: &str) -> Result<u64, CacheError> {
        Err(CacheError::backend("connection refused"))
    }
}

#[tokio::test]
async fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let config = CacheConfig::default();
    let cache = Arc::new(CacheAside::new(Arc::new(MemoryCache::new(&config)), config));
    let comments = CommentService::new(Arc::new(MemoryStore::new()), cache);

    // Miss, hit, invalidation, and both latency histograms.
    let created = comments
        .create_comment(CreateCommentParams {
            post_id: "p1".to_string(),
            author_id: "ana".to_string(),
            parent_comment_id: None,
            body: "counted".to_string(),
        })
        .await
        .unwrap();
    comments.get_comment(&created.id).await.unwrap();
    comments.get_comment(&created.id).await.unwrap();
    comments.list_by_post("p1", Page::default()).await.unwrap();
    comments
        .update_comment(
            &created.id,
            "ana",
            UpdateCommentParams {
                body: "counted twice".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();

    // Degradation counter, via a cache whose backend is down.
    let degraded = Arc::new(CacheAside::new(Arc::new(DownCache), CacheConfig::default()));
    let flaky = CommentService::new(Arc::new(MemoryStore::new()), degraded);
    assert_eq!(flaky.get_comment("nothing-here").await.unwrap(), None);

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "scalo_cache_hit_total",
        "scalo_cache_miss_total",
        "scalo_cache_degraded_total",
        "scalo_cache_invalidation_total",
        "scalo_read_through_ms",
        "scalo_invalidate_ms",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
