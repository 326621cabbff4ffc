//! Builder for configuring Curator initialization.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::cache::{CacheBackend, CacheStore, MemoryCache, SqliteCache};
use crate::catalog::CatalogClient;
use crate::config::{CuratorConfig, NetworkConfig};
use crate::error::Result;
use crate::filter::PluginFilter;
use crate::observer::{default_observer, DynObserver};
use crate::source::RemoteSource;
use crate::Curator;

enum CacheChoice {
    Memory,
    Sqlite(PathBuf),
    Backend(Arc<dyn CacheBackend>),
}

/// Builder for configuring Curator initialization.
///
/// # Example
///
/// ```rust,ignore
/// use curator_core::{Curator, CuratorConfig};
///
/// let curator = Curator::builder(CuratorConfig::new("https://example.com/featured.json"))
///     .with_sqlite_cache("/var/cache/curator/curator-cache.sqlite")
///     .build()?;
/// ```
pub struct CuratorBuilder {
    config: CuratorConfig,
    cache: CacheChoice,
    observer: DynObserver,
    catalog_base: String,
    request_delay: Duration,
}

impl CuratorBuilder {
    /// Create a new builder around injected settings.
    pub fn new(config: CuratorConfig) -> Self {
        Self {
            config,
            cache: CacheChoice::Memory,
            observer: default_observer(),
            catalog_base: NetworkConfig::CATALOG_API_BASE.to_string(),
            request_delay: NetworkConfig::CATALOG_REQUEST_DELAY,
        }
    }

    /// Persist cache entries in a SQLite database at `path`.
    pub fn with_sqlite_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache = CacheChoice::Sqlite(path.into());
        self
    }

    /// Keep cache entries in process memory.
    ///
    /// Default.
    pub fn with_memory_cache(mut self) -> Self {
        self.cache = CacheChoice::Memory;
        self
    }

    /// Use a caller-provided cache backend.
    pub fn with_cache_backend(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.cache = CacheChoice::Backend(backend);
        self
    }

    /// Receive error and fetch notifications.
    ///
    /// Default: [`TracingObserver`](crate::observer::TracingObserver)
    pub fn with_observer(mut self, observer: DynObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Catalog host, e.g. `https://api.wordpress.org`.
    pub fn with_catalog_base(mut self, base_url: impl Into<String>) -> Self {
        self.catalog_base = base_url.into();
        self
    }

    /// Pause between consecutive catalog requests.
    ///
    /// Default: 100 ms
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Build the Curator instance.
    pub fn build(self) -> Result<Curator> {
        let backend: Arc<dyn CacheBackend> = match self.cache {
            CacheChoice::Memory => Arc::new(MemoryCache::new()),
            CacheChoice::Sqlite(path) => {
                info!("Opening curator cache at {}", path.display());
                Arc::new(SqliteCache::new(&path)?)
            }
            CacheChoice::Backend(backend) => backend,
        };

        let cache = CacheStore::new(backend, self.config.cache_ttl);
        if let Err(e) = cache.cleanup_expired() {
            warn!("Failed to purge expired cache entries: {}", e);
        }

        let source = RemoteSource::new(self.config.clone(), cache.clone(), self.observer.clone())?;
        let catalog = CatalogClient::new(self.observer.clone())?
            .with_base_url(self.catalog_base)
            .with_request_delay(self.request_delay);

        let filter = PluginFilter::new(source, catalog, cache, self.observer);

        Ok(Curator {
            config: self.config,
            filter,
        })
    }
}
