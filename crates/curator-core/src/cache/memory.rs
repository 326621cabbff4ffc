//! Process-local cache backend.

use super::traits::{CacheBackend, CacheEntry};
use crate::error::{CuratorError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory cache backend keyed by `(namespace, key)`.
///
/// Expired entries stay in the map until read or cleaned up, but are never
/// returned.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<(String, String), CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<(String, String), CacheEntry>>> {
        self.entries
            .lock()
            .map_err(|e| CuratorError::Other(format!("Memory cache lock poisoned: {}", e)))
    }
}

impl CacheBackend for MemoryCache {
    fn get_entry(&self, namespace: &str, key: &str) -> Result<Option<CacheEntry>> {
        let mut entries = self.lock()?;
        let map_key = (namespace.to_string(), key.to_string());

        if let Some(entry) = entries.get(&map_key) {
            if !entry.is_expired_at(Utc::now()) {
                return Ok(Some(entry.clone()));
            }
        } else {
            return Ok(None);
        }

        entries.remove(&map_key);
        Ok(None)
    }

    fn set_with_expiry(
        &self,
        namespace: &str,
        key: &str,
        value: &[u8],
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let entry = CacheEntry::new(value.to_vec(), Utc::now(), expires_at);
        self.lock()?
            .insert((namespace.to_string(), key.to_string()), entry);
        Ok(())
    }

    fn invalidate(&self, namespace: &str, key: &str) -> Result<bool> {
        Ok(self
            .lock()?
            .remove(&(namespace.to_string(), key.to_string()))
            .is_some())
    }

    fn cleanup_expired(&self) -> Result<usize> {
        let mut entries = self.lock()?;
        let now = Utc::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        Ok(before - entries.len())
    }

    fn clear_all(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }
}
