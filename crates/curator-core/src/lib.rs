//! Curator Core - Headless library for serving a remotely curated plugin listing.
//!
//! A remote JSON document names the plugins to feature. This crate fetches and
//! validates that list, enriches each slug from the WordPress.org catalog,
//! caches the assembled listing with a TTL, and falls back to the consumer's
//! default listing whenever anything along the way fails.
//!
//! # Example
//!
//! ```rust,ignore
//! use curator_core::{Curator, CuratorConfig, Interception, PluginQuery};
//!
//! #[tokio::main]
//! async fn main() -> curator_core::Result<()> {
//!     let config = CuratorConfig::new("https://example.com/featured.json");
//!     let curator = Curator::builder(config)
//!         .with_sqlite_cache("/tmp/curator-cache.sqlite")
//!         .build()?;
//!
//!     match curator.query_plugins(&PluginQuery::featured()).await {
//!         Interception::Override(listing) => println!("{} plugins", listing.info.results),
//!         Interception::Fallback(reason) => println!("default listing: {}", reason),
//!         Interception::NotApplicable => {}
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod network;
pub mod observer;
pub mod slug;
pub mod source;

mod api;

// Re-export commonly used types
pub use api::{Curator, CuratorBuilder};
pub use cache::{CacheBackend, CacheKey, CacheStats, CacheStore, KeyStats, MemoryCache, SqliteCache};
pub use catalog::{CatalogClient, CatalogEntry, FetchOutcome, VerificationReport};
pub use config::{CacheDuration, CuratorConfig};
pub use error::{CuratorError, ErrorKind, Result};
pub use filter::{
    BrowseResponse, FallbackReason, Interception, PageInfo, PartialStatus, PluginFilter,
    PluginQuery,
};
pub use observer::{Component, CurationObserver, DynObserver, NoopObserver, TracingObserver};
pub use slug::{validate_slugs, Slug};
pub use source::{ConnectionTestReport, RemoteDocument, RemoteSource, SlugCounts};
