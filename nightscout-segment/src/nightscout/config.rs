//! Segment configuration, resolved once from properties.

use std::time::Duration;

use crate::env::Properties;

use super::icons::TrendIcons;

/// Property key: full entries URL, including any token query parameter.
pub const URL: &str = "url";

/// Property key: cache lifetime in minutes; zero or negative disables caching.
pub const CACHE_TIMEOUT: &str = "cache_timeout";

/// Property key: output template.
pub const SEGMENT_TEMPLATE: &str = "segment_template";

/// Property key: HTTP timeout in milliseconds.
pub const HTTP_TIMEOUT: &str = "http_timeout";

/// Default cache lifetime (minutes).
pub const DEFAULT_CACHE_TIMEOUT_MINS: i64 = 5;

/// Default HTTP timeout (milliseconds), shared with the other segments.
pub const DEFAULT_HTTP_TIMEOUT_MS: i64 = 20;

/// Default output template: the value alone.
pub const DEFAULT_TEMPLATE: &str = "{{.Sgv}}";

/// Resolved configuration for a Nightscout segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentConfig {
    /// Entries URL; also the cache key.
    pub url: String,

    /// Cache lifetime in minutes. Zero means caching is disabled.
    pub cache_timeout_mins: u64,

    /// Timeout for the GET.
    pub http_timeout: Duration,

    /// Output template.
    pub template: String,

    /// Trend icons after overrides.
    pub icons: TrendIcons,
}

impl SegmentConfig {
    /// Resolve configuration from properties.
    pub fn from_properties(props: &Properties) -> Self {
        let cache_timeout = props.get_int(CACHE_TIMEOUT, DEFAULT_CACHE_TIMEOUT_MINS);

        let http_timeout_ms = match props.get_int(HTTP_TIMEOUT, DEFAULT_HTTP_TIMEOUT_MS) {
            ms if ms > 0 => ms,
            _ => DEFAULT_HTTP_TIMEOUT_MS,
        };

        Self {
            url: props.get_string(URL, ""),
            cache_timeout_mins: u64::try_from(cache_timeout).unwrap_or(0),
            http_timeout: Duration::from_millis(http_timeout_ms.unsigned_abs()),
            template: props.get_string(SEGMENT_TEMPLATE, DEFAULT_TEMPLATE),
            icons: TrendIcons::from_properties(props),
        }
    }

    /// Whether reads go through the cache.
    pub fn is_cache_enabled(&self) -> bool {
        self.cache_timeout_mins > 0
    }
}
