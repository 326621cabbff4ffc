//! Well-known-key cache store used by the curation pipeline.

use super::traits::{CacheBackend, CacheEntry};
use crate::error::{CuratorError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Namespace holding every curator entry in a shared backend.
pub const CACHE_NAMESPACE: &str = "curator";

/// The fixed set of keys the pipeline reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKey {
    /// Validated slug list from the remote document.
    Slugs,
    /// Assembled browse response.
    Plugins,
    /// Partial-status record for the last short resolution.
    Partial,
}

impl CacheKey {
    pub const ALL: [CacheKey; 3] = [CacheKey::Slugs, CacheKey::Plugins, CacheKey::Partial];

    /// Storage key inside [`CACHE_NAMESPACE`].
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Slugs => "remote_slugs",
            CacheKey::Plugins => "plugins_data",
            CacheKey::Partial => "plugins_partial",
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Introspection data for one well-known key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStats {
    pub key: CacheKey,
    pub exists: bool,
    pub expires_at: Option<DateTime<Utc>>,
    /// Seconds until expiry, 0 when absent or expired.
    pub remaining_secs: u64,
    pub size_bytes: u64,
    pub size_display: String,
}

/// Stats for every well-known key, in [`CacheKey::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub keys: Vec<KeyStats>,
}

impl CacheStats {
    pub fn get(&self, key: CacheKey) -> Option<&KeyStats> {
        self.keys.iter().find(|stats| stats.key == key)
    }
}

/// Typed cache access over a [`CacheBackend`] with a default TTL.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    default_ttl: Duration,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn CacheBackend>, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Read and decode a cached value.
    ///
    /// Storage errors and undecodable payloads are logged and reported as a
    /// miss, never as a failure.
    pub fn get<T: DeserializeOwned>(&self, key: CacheKey) -> Option<T> {
        let bytes = self.get_raw(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Read the raw bytes of a cached value.
    pub fn get_raw(&self, key: CacheKey) -> Option<Vec<u8>> {
        match self.backend.get(CACHE_NAMESPACE, key.as_str()) {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Store a value with the default TTL.
    pub fn set<T: Serialize>(&self, key: CacheKey, value: &T) -> Result<()> {
        self.set_with_ttl(key, value, self.default_ttl)
    }

    /// Store a value with an explicit TTL, replacing any existing entry.
    pub fn set_with_ttl<T: Serialize>(&self, key: CacheKey, value: &T, ttl: Duration) -> Result<()> {
        let bytes = serde_json::to_vec(value).map_err(|e| CuratorError::Json {
            message: format!("Failed to encode cache entry {}: {}", key, e),
            source: Some(e),
        })?;
        self.backend
            .set(CACHE_NAMESPACE, key.as_str(), &bytes, ttl)?;
        debug!("Cached {} for {:?}", key, ttl);
        Ok(())
    }

    /// Delete a key. Deleting an absent key succeeds.
    pub fn delete(&self, key: CacheKey) -> Result<()> {
        let removed = self.backend.invalidate(CACHE_NAMESPACE, key.as_str())?;
        if removed {
            debug!("Deleted cache entry {}", key);
        }
        Ok(())
    }

    /// Delete every well-known key.
    ///
    /// All deletions are attempted; the first failure is returned.
    pub fn clear_all(&self) -> Result<()> {
        let mut first_error = None;
        for key in CacheKey::ALL {
            if let Err(e) = self.delete(key) {
                warn!("Failed to delete cache entry {}: {}", key, e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Physically remove expired entries from the backend.
    pub fn cleanup_expired(&self) -> Result<usize> {
        let removed = self.backend.cleanup_expired()?;
        if removed > 0 {
            debug!("Purged {} expired cache entries", removed);
        }
        Ok(removed)
    }

    /// Whether a key currently holds an unexpired value.
    pub fn exists(&self, key: CacheKey) -> bool {
        self.entry(key).is_some()
    }

    fn entry(&self, key: CacheKey) -> Option<CacheEntry> {
        match self.backend.get_entry(CACHE_NAMESPACE, key.as_str()) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Report existence, remaining TTL and size for every well-known key.
    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let keys = CacheKey::ALL
            .into_iter()
            .map(|key| match self.entry(key) {
                Some(entry) => KeyStats {
                    key,
                    exists: true,
                    expires_at: Some(entry.expires_at),
                    remaining_secs: entry.remaining_at(now).as_secs(),
                    size_bytes: entry.size_bytes,
                    size_display: format_size(entry.size_bytes),
                },
                None => KeyStats {
                    key,
                    exists: false,
                    expires_at: None,
                    remaining_secs: 0,
                    size_bytes: 0,
                    size_display: format_size(0),
                },
            })
            .collect();

        CacheStats { keys }
    }
}

/// Human-readable size with B / KB / MB units.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}
