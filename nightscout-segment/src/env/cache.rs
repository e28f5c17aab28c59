//! Key-value cache store with per-entry TTL.
//!
//! The segment only needs two operations: look a key up, and store a
//! serialized value with a lifetime in minutes. Expiry is the store's job;
//! callers never see an expired entry.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache as MokaCache;

/// Errors from a cache store write.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading or writing the backing file failed
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing data could not be (de)serialized
    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The system clock is before the unix epoch
    #[error("system time before unix epoch")]
    Clock,
}

/// A string-valued cache keyed by string.
pub trait CacheStore: Send + Sync {
    /// Look up a live (non-expired) entry.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key` for `ttl_mins` minutes.
    fn set(&self, key: &str, value: String, ttl_mins: u64) -> Result<(), CacheError>;
}

/// Default maximum number of in-memory entries.
const DEFAULT_MAX_CAPACITY: u64 = 1000;

/// A cached value together with its own lifetime.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expiry policy that reads the lifetime stored with each entry.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process cache store.
pub struct MemoryCache {
    entries: MokaCache<String, Entry>,
}

impl MemoryCache {
    /// Create an empty cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Create an empty cache holding at most `max_capacity` entries.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let entries = MokaCache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { entries }
    }

    /// Number of live entries (approximate, as reported by moka).
    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value)
    }

    fn set(&self, key: &str, value: String, ttl_mins: u64) -> Result<(), CacheError> {
        let ttl = Duration::from_secs(ttl_mins.saturating_mul(60));
        self.entries.insert(key.to_string(), Entry { value, ttl });
        Ok(())
    }
}
