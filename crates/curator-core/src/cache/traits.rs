//! Cache backend trait and types.

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A cached entry with metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The cached data as bytes.
    pub value: Vec<u8>,
    /// When the entry was cached.
    pub cached_at: DateTime<Utc>,
    /// When the entry expires.
    pub expires_at: DateTime<Utc>,
    /// Size of the cached data in bytes.
    pub size_bytes: u64,
}

impl CacheEntry {
    pub fn new(value: Vec<u8>, cached_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        let size_bytes = value.len() as u64;
        Self {
            value,
            cached_at,
            expires_at,
            size_bytes,
        }
    }

    /// An entry is logically absent once `now >= expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Convert a TTL into an absolute expiry timestamp.
pub(crate) fn expiry_from_ttl(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Generic cache backend trait.
///
/// Provides namespace-isolated key-value storage with TTL support.
/// Implementations must make single-key reads and writes atomic; nothing
/// spanning several keys is transactional.
pub trait CacheBackend: Send + Sync {
    /// Get cached data by key.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        self.get_entry(namespace, key)
            .map(|entry| entry.map(|e| e.value))
    }

    /// Get cached data with full entry metadata. Expired entries are `None`.
    fn get_entry(&self, namespace: &str, key: &str) -> Result<Option<CacheEntry>>;

    /// Set cached data with TTL.
    ///
    /// Overwrites any existing entry with the same key.
    fn set(&self, namespace: &str, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        self.set_with_expiry(namespace, key, value, expiry_from_ttl(Utc::now(), ttl))
    }

    /// Set cached data with explicit expiration time.
    fn set_with_expiry(
        &self,
        namespace: &str,
        key: &str,
        value: &[u8],
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Invalidate (delete) a specific key.
    ///
    /// Returns whether an entry was actually removed.
    fn invalidate(&self, namespace: &str, key: &str) -> Result<bool>;

    /// Check if a cache entry exists and is valid (not expired).
    fn is_valid(&self, namespace: &str, key: &str) -> Result<bool> {
        self.get_entry(namespace, key).map(|entry| entry.is_some())
    }

    /// Remove expired entries from all namespaces.
    ///
    /// Returns the number of entries removed.
    fn cleanup_expired(&self) -> Result<usize>;

    /// Clear all cached data across all namespaces.
    fn clear_all(&self) -> Result<()>;
}
