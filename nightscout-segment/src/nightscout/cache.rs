//! Read-through caching for reading sources.
//!
//! A cached entry is the JSON of the last reading, keyed by the entries URL,
//! so at most one live fetch happens per URL per TTL window. Concurrent
//! callers on a cold cache may each fetch; there is no single-flight.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::env::CacheStore;

use super::error::FetchError;
use super::fetch::ReadingSource;
use super::types::Reading;

/// A `ReadingSource` wrapped with a read-through cache.
pub struct CachedSource<S> {
    inner: S,
    cache: Arc<dyn CacheStore>,
    key: String,
    ttl_mins: u64,
}

impl<S: ReadingSource> CachedSource<S> {
    /// Wrap `inner`, caching under `key` for `ttl_mins` minutes.
    pub fn new(
        inner: S,
        cache: Arc<dyn CacheStore>,
        key: impl Into<String>,
        ttl_mins: u64,
    ) -> Self {
        Self {
            inner,
            cache,
            key: key.into(),
            ttl_mins,
        }
    }

    /// The cache key (the source URL).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Access the wrapped source, bypassing the cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn cached(&self) -> Option<Reading> {
        let payload = self.cache.get(&self.key)?;

        match serde_json::from_str(&payload) {
            Ok(reading) => Some(reading),
            Err(e) => {
                debug!(key = %self.key, error = %e, "Discarding unreadable cache entry");
                None
            }
        }
    }

    fn store(&self, reading: &Reading) {
        let result = serde_json::to_string(reading)
            .map_err(Into::into)
            .and_then(|payload| self.cache.set(&self.key, payload, self.ttl_mins));

        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "Failed to cache Nightscout entry");
        }
    }
}

impl<S: ReadingSource> ReadingSource for CachedSource<S> {
    fn fetch(&self) -> Result<Reading, FetchError> {
        // Try cache first
        if let Some(reading) = self.cached() {
            debug!(key = %self.key, "Nightscout cache hit");
            return Ok(reading);
        }

        let reading = self.inner.fetch()?;
        self.store(&reading);

        Ok(reading)
    }
}
