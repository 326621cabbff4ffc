//! Cache layer for the curation pipeline.
//!
//! - [`CacheBackend`] is the raw TTL key-value contract
//! - [`SqliteCache`] persists entries and can be shared between processes
//! - [`MemoryCache`] keeps entries for the life of the process
//! - [`CacheStore`] owns the well-known keys and the default TTL

mod memory;
mod sqlite;
mod store;
mod traits;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;
pub use store::{format_size, CacheKey, CacheStats, CacheStore, KeyStats, CACHE_NAMESPACE};
pub use traits::{CacheBackend, CacheEntry};
