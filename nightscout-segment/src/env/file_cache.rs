//! Disk-based cache store.
//!
//! A status line is re-rendered by a fresh process on every prompt, so an
//! in-memory cache never gets a second hit there. This store keeps entries
//! in a single JSON file instead.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::cache::{CacheError, CacheStore};

/// One stored value with its absolute expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedValue {
    /// The stored payload.
    value: String,
    /// Unix timestamp after which the entry is dead.
    expires_at_secs: u64,
}

/// Cache file contents.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    entries: HashMap<String, CachedValue>,
}

/// Cache store persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    /// Create a cache backed by the file at `path`.
    ///
    /// The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cache file; a missing or corrupt file reads as empty.
    fn load(&self) -> CacheFile {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }
}

fn now_secs() -> Result<u64, CacheError> {
    Ok(SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|_| CacheError::Clock)?
        .as_secs())
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        let now = now_secs().ok()?;
        let entry = self.load().entries.remove(key)?;

        if now >= entry.expires_at_secs {
            return None;
        }

        Some(entry.value)
    }

    fn set(&self, key: &str, value: String, ttl_mins: u64) -> Result<(), CacheError> {
        let now = now_secs()?;
        let mut file = self.load();

        file.entries.retain(|_, entry| entry.expires_at_secs > now);
        file.entries.insert(
            key.to_string(),
            CachedValue {
                value,
                expires_at_secs: now.saturating_add(ttl_mins.saturating_mul(60)),
            },
        );

        // Create parent directories if needed
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(&file)?;
        std::fs::write(&self.path, json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("cache.json"));

        cache.set("https://a.example", "one".into(), 5).unwrap();
        cache.set("https://b.example", "two".into(), 5).unwrap();

        assert_eq!(cache.get("https://a.example").as_deref(), Some("one"));
        assert_eq!(cache.get("https://b.example").as_deref(), Some("two"));
    }

    #[test]
    fn survives_a_new_handle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        FileCache::new(&path).set("k", "v".into(), 5).unwrap();

        assert_eq!(FileCache::new(&path).get("k").as_deref(), Some("v"));
    }

    #[test]
    fn zero_ttl_is_expired() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("cache.json"));

        cache.set("k", "v".into(), 0).unwrap();

        assert!(cache.get("k").is_none());
    }

    #[test]
    fn missing_file_is_a_miss() {
        let cache = FileCache::new("/nonexistent/path/cache.json");
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn corrupt_file_is_a_miss_and_gets_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "not json").unwrap();
        let cache = FileCache::new(&path);

        assert!(cache.get("k").is_none());

        cache.set("k", "v".into(), 5).unwrap();
        assert_eq!(cache.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("cache.json");
        let cache = FileCache::new(&path);
        assert_eq!(cache.path(), path.as_path());

        cache.set("k", "v".into(), 5).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempdir().unwrap();
        // A directory where the file should be.
        let cache = FileCache::new(dir.path());

        assert!(cache.set("k", "v".into(), 5).is_err());
    }
}
