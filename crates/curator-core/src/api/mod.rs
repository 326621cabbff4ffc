//! Curator facade: the serving path plus administrative operations.

mod builder;

pub use builder::CuratorBuilder;

use crate::cache::{CacheKey, CacheStats};
use crate::catalog::VerificationReport;
use crate::config::CuratorConfig;
use crate::error::Result;
use crate::filter::{Interception, PartialStatus, PluginFilter, PluginQuery};
use crate::slug::Slug;
use crate::source::ConnectionTestReport;
use tracing::info;

/// Entry point for serving and administering the curated listing.
pub struct Curator {
    pub(crate) config: CuratorConfig,
    pub(crate) filter: PluginFilter,
}

impl Curator {
    pub fn builder(config: CuratorConfig) -> CuratorBuilder {
        CuratorBuilder::new(config)
    }

    pub fn config(&self) -> &CuratorConfig {
        &self.config
    }

    /// Answer a listing query; see [`PluginFilter::filter_query`].
    pub async fn query_plugins(&self, query: &PluginQuery) -> Interception {
        self.filter.filter_query(query).await
    }

    /// The validated slug list, from cache unless `force_refresh`.
    pub async fn slugs(&self, force_refresh: bool) -> Result<Vec<Slug>> {
        self.filter.source().get_slugs(force_refresh).await
    }

    /// Fetch and validate the remote slug document without touching the cache.
    pub async fn test_connection(&self) -> ConnectionTestReport {
        self.filter.source().test_connection().await
    }

    /// Check which slugs exist in the catalog.
    pub async fn verify_slugs(&self, slugs: &[Slug]) -> VerificationReport {
        self.filter.catalog().verify_many(slugs).await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.filter.cache().stats()
    }

    /// Partial-status record from the last short resolution, if any.
    pub fn partial_status(&self) -> Option<PartialStatus> {
        self.filter.cache().get(CacheKey::Partial)
    }

    /// Delete every cached slug list, response and partial-status record.
    pub fn clear_cache(&self) -> Result<()> {
        self.filter.cache().clear_all()?;
        info!("Curator cache cleared");
        Ok(())
    }

    /// Clear the cache, then rebuild the featured listing.
    pub async fn refresh(&self) -> Result<Interception> {
        self.clear_cache()?;
        Ok(self.query_plugins(&PluginQuery::featured()).await)
    }
}
