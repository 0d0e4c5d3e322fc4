//! Tracing and metrics bootstrap for embedders that want the crate's
//! defaults instead of wiring their own subscriber.

use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use thiserror::Error;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::cache::aside::{
    METRIC_CACHE_DEGRADED_TOTAL, METRIC_CACHE_HIT_TOTAL, METRIC_CACHE_INVALIDATION_TOTAL,
    METRIC_CACHE_MISS_TOTAL, METRIC_INVALIDATE_MS, METRIC_READ_THROUGH_MS,
};
use crate::config::{LogFormat, LoggingConfig};

static METRIC_DESCRIPTIONS: Once = Once::new();

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry initialization failed: {0}")]
    Init(String),
}

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingConfig) -> Result<(), TelemetryError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level_filter().into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            TelemetryError::Init(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_CACHE_HIT_TOTAL,
            Unit::Count,
            "Total number of cache hits, labeled by entity."
        );
        describe_counter!(
            METRIC_CACHE_MISS_TOTAL,
            Unit::Count,
            "Total number of cache misses, labeled by entity."
        );
        describe_counter!(
            METRIC_CACHE_DEGRADED_TOTAL,
            Unit::Count,
            "Total number of cache operations that failed or timed out and were served as misses, labeled by operation."
        );
        describe_counter!(
            METRIC_CACHE_INVALIDATION_TOTAL,
            Unit::Count,
            "Total number of write-path invalidations, labeled by entity."
        );
        describe_histogram!(
            METRIC_READ_THROUGH_MS,
            Unit::Milliseconds,
            "Read-through latency in milliseconds, cache and store time included."
        );
        describe_histogram!(
            METRIC_INVALIDATE_MS,
            Unit::Milliseconds,
            "Write-path invalidation latency in milliseconds."
        );
    });
}
