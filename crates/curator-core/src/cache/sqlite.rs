//! SQLite-based cache implementation.

use super::traits::{CacheBackend, CacheEntry};
use crate::error::{CuratorError, Result};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// SQLite-based cache backend.
///
/// Several processes may point at the same database file; each statement is
/// atomic on its own, which is all the curator relies on.
/// Thread-safe via internal mutex on the connection.
pub struct SqliteCache {
    /// Database connection (wrapped for thread safety).
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCache {
    /// Create a new cache at the specified database path.
    ///
    /// Creates the database and tables if they don't exist.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CuratorError::Io {
                message: format!("Failed to create cache directory: {}", e),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }

        let conn = Connection::open(db_path).map_err(|e| CuratorError::Database {
            message: format!("Failed to open cache database: {}", e),
            source: Some(e),
        })?;

        // WAL lets readers in other processes proceed during a write
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| CuratorError::Database {
                message: format!("Failed to set pragmas: {}", e),
                source: Some(e),
            })?;

        Self::from_connection(conn)
    }

    /// Create a cache backed by a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| CuratorError::Database {
            message: format!("Failed to open in-memory cache database: {}", e),
            source: Some(e),
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let cache = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                namespace TEXT NOT NULL,
                key TEXT NOT NULL,
                value BLOB NOT NULL,
                cached_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL,
                size_bytes INTEGER NOT NULL,
                PRIMARY KEY (namespace, key)
            );

            -- Index for expiration queries
            CREATE INDEX IF NOT EXISTS idx_cache_expires
                ON cache_entries(namespace, expires_at);
            "#,
        )
        .map_err(|e| CuratorError::Database {
            message: format!("Failed to initialize cache schema: {}", e),
            source: Some(e),
        })?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| CuratorError::Database {
            message: format!("Failed to lock database: {}", e),
            source: None,
        })
    }
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl CacheBackend for SqliteCache {
    fn get_entry(&self, namespace: &str, key: &str) -> Result<Option<CacheEntry>> {
        let conn = self.lock()?;
        let now = Utc::now().timestamp_millis();

        let row: Option<(Vec<u8>, i64, i64, i64)> = conn
            .query_row(
                r#"
                SELECT value, cached_at, expires_at, size_bytes
                FROM cache_entries
                WHERE namespace = ?1 AND key = ?2 AND expires_at > ?3
                "#,
                params![namespace, key, now],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()
            .map_err(|e| CuratorError::Database {
                message: format!("Failed to query cache entry: {}", e),
                source: Some(e),
            })?;

        Ok(row.map(|(value, cached_at, expires_at, size_bytes)| CacheEntry {
            value,
            cached_at: from_millis(cached_at),
            expires_at: from_millis(expires_at),
            size_bytes: size_bytes as u64,
        }))
    }

    fn set_with_expiry(
        &self,
        namespace: &str,
        key: &str,
        value: &[u8],
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let conn = self.lock()?;

        let now = Utc::now().timestamp_millis();
        let size_bytes = value.len() as i64;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO cache_entries
            (namespace, key, value, cached_at, expires_at, size_bytes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                namespace,
                key,
                value,
                now,
                expires_at.timestamp_millis(),
                size_bytes
            ],
        )
        .map_err(|e| CuratorError::Database {
            message: format!("Failed to set cache entry: {}", e),
            source: Some(e),
        })?;

        debug!("Cached {}/{} ({} bytes)", namespace, key, size_bytes);
        Ok(())
    }

    fn invalidate(&self, namespace: &str, key: &str) -> Result<bool> {
        let conn = self.lock()?;

        let deleted = conn
            .execute(
                "DELETE FROM cache_entries WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
            )
            .map_err(|e| CuratorError::Database {
                message: format!("Failed to invalidate cache entry: {}", e),
                source: Some(e),
            })?;

        Ok(deleted > 0)
    }

    fn cleanup_expired(&self) -> Result<usize> {
        let conn = self.lock()?;
        let now = Utc::now().timestamp_millis();

        let deleted = conn
            .execute(
                "DELETE FROM cache_entries WHERE expires_at <= ?1",
                params![now],
            )
            .map_err(|e| CuratorError::Database {
                message: format!("Failed to cleanup expired entries: {}", e),
                source: Some(e),
            })?;

        if deleted > 0 {
            debug!("Cleaned up {} expired cache entries", deleted);
        }

        Ok(deleted)
    }

    fn clear_all(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute("DELETE FROM cache_entries", [])
            .map_err(|e| CuratorError::Database {
                message: format!("Failed to clear cache entries: {}", e),
                source: Some(e),
            })?;

        debug!("Cleared all cache data");
        Ok(())
    }
}
