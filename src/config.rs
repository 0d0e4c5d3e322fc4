//! Typed settings, embeddable in a host application's own config layer.
//!
//! The crate does not read files or the environment itself; embedders
//! deserialize [`Settings`] from whatever source they already use and
//! hand the pieces to [`crate::cache::CacheAside`] and
//! [`crate::telemetry::init`].

use std::str::FromStr;

use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::cache::CacheConfig;

const DEFAULT_LOG_LEVEL: &str = "info";

/// Everything this crate can be configured with.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base log level (trace|debug|info|warn|error). Unparseable values
    /// fall back to INFO rather than failing startup.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.level).unwrap_or(LevelFilter::INFO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_no_input() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(settings.cache.enabled);
        assert_eq!(settings.cache.op_timeout_ms, 250);
        assert_eq!(settings.logging.level_filter(), LevelFilter::INFO);
        assert_eq!(settings.logging.format, LogFormat::Compact);
    }

    #[test]
    fn sections_deserialize_from_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [cache]
            enabled = false
            op_timeout_ms = 50
            trip_ttl_secs = 60

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert!(!settings.cache.enabled);
        assert_eq!(settings.cache.op_timeout_ms, 50);
        assert_eq!(settings.cache.trip_ttl_secs, 60);
        // Untouched fields keep their defaults.
        assert_eq!(settings.cache.comment_ttl_secs, 3600);
        assert_eq!(settings.logging.level_filter(), LevelFilter::DEBUG);
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn bad_level_falls_back_to_info() {
        let logging = LoggingConfig {
            level: "shouting".to_string(),
            format: LogFormat::Compact,
        };
        assert_eq!(logging.level_filter(), LevelFilter::INFO);
    }

    #[test]
    fn off_is_a_valid_level() {
        let logging = LoggingConfig {
            level: "off".to_string(),
            format: LogFormat::Compact,
        };
        assert_eq!(logging.level_filter(), LevelFilter::OFF);
    }
}
