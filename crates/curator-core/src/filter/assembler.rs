//! Serving-path orchestrator for the featured listing.
//!
//! Every failure below this point degrades to [`Interception::Fallback`];
//! nothing is surfaced to the consumer as an error.

use super::types::{build_response, FallbackReason, Interception, PartialStatus, PluginQuery};
use crate::cache::{CacheKey, CacheStore};
use crate::catalog::CatalogClient;
use crate::error::ErrorKind;
use crate::observer::{Component, DynObserver};
use crate::source::RemoteSource;
use tracing::{debug, info, warn};

/// Intercepts featured listing queries and answers them from the curated list.
pub struct PluginFilter {
    source: RemoteSource,
    catalog: CatalogClient,
    cache: CacheStore,
    observer: DynObserver,
}

impl PluginFilter {
    pub fn new(
        source: RemoteSource,
        catalog: CatalogClient,
        cache: CacheStore,
        observer: DynObserver,
    ) -> Self {
        Self {
            source,
            catalog,
            cache,
            observer,
        }
    }

    pub fn source(&self) -> &RemoteSource {
        &self.source
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Decide how to answer `query`.
    pub async fn filter_query(&self, query: &PluginQuery) -> Interception {
        if !query.is_featured_listing() {
            return Interception::NotApplicable;
        }

        if let Some(cached) = self.cache.get(CacheKey::Plugins) {
            debug!("Serving featured listing from cache");
            return Interception::Override(cached);
        }

        let slugs = match self.source.get_slugs(false).await {
            Ok(slugs) => slugs,
            Err(e) => {
                return self.fallback(FallbackReason::SlugsUnavailable {
                    kind: e.kind(),
                    message: e.to_string(),
                })
            }
        };

        let outcome = self.catalog.fetch_many(&slugs).await;
        if outcome.entries.is_empty() {
            return self.fallback(FallbackReason::NoCatalogEntries {
                requested: slugs.len(),
                kind: outcome.failure_kind.unwrap_or(ErrorKind::Other),
            });
        }

        let response = build_response(outcome.entries);
        if let Err(e) = self.cache.set(CacheKey::Plugins, &response) {
            warn!("Failed to cache featured listing: {}", e);
        }

        match PartialStatus::from_counts(slugs.len(), response.info.results) {
            Some(partial) => {
                info!(
                    "Featured listing is partial: {} of {} plugins ({} missing)",
                    partial.received, partial.expected, partial.missing
                );
                if let Err(e) = self.cache.set(CacheKey::Partial, &partial) {
                    warn!("Failed to record partial status: {}", e);
                }
            }
            None => {
                if let Err(e) = self.cache.delete(CacheKey::Partial) {
                    warn!("Failed to clear stale partial status: {}", e);
                }
            }
        }

        Interception::Override(response)
    }

    fn fallback(&self, reason: FallbackReason) -> Interception {
        let message = format!("{}, using default listing", reason);
        let kind = match &reason {
            FallbackReason::SlugsUnavailable { kind, .. }
            | FallbackReason::NoCatalogEntries { kind, .. } => *kind,
        };
        self.observer.on_error(kind, &message, Component::PluginFilter);
        Interception::Fallback(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::CuratorConfig;
    use crate::filter::BrowseResponse;
    use crate::observer::NoopObserver;
    use std::sync::Arc;
    use std::time::Duration;

    fn filter_with(config: CuratorConfig) -> PluginFilter {
        let observer: DynObserver = Arc::new(NoopObserver);
        let cache = CacheStore::new(Arc::new(MemoryCache::new()), Duration::from_secs(60));
        let source = RemoteSource::new(config, cache.clone(), observer.clone()).unwrap();
        let catalog = CatalogClient::new(observer.clone())
            .unwrap()
            .with_request_delay(Duration::ZERO);
        PluginFilter::new(source, catalog, cache, observer)
    }

    #[tokio::test]
    async fn test_other_queries_pass_through() {
        let filter = filter_with(CuratorConfig::default());
        let popular = PluginQuery::new("query_plugins").with_browse("popular");
        assert_eq!(filter.filter_query(&popular).await, Interception::NotApplicable);
        assert_eq!(
            filter.filter_query(&PluginQuery::new("plugin_information")).await,
            Interception::NotApplicable
        );
    }

    #[tokio::test]
    async fn test_missing_url_falls_back() {
        let filter = filter_with(CuratorConfig::default());
        match filter.filter_query(&PluginQuery::featured()).await {
            Interception::Fallback(FallbackReason::SlugsUnavailable { kind, .. }) => {
                assert_eq!(kind, ErrorKind::Configuration);
            }
            other => panic!("expected fallback, got {:?}", other),
        }
        assert!(!filter.cache().exists(CacheKey::Plugins));
    }

    #[tokio::test]
    async fn test_cached_listing_served_verbatim() {
        let filter = filter_with(CuratorConfig::default());
        let cached: BrowseResponse = serde_json::from_value(serde_json::json!({
            "plugins": [{"slug": "akismet", "name": "Akismet"}],
            "info": {"page": 1, "pages": 1, "results": 1}
        }))
        .unwrap();
        filter.cache().set(CacheKey::Plugins, &cached).unwrap();

        let result = filter.filter_query(&PluginQuery::featured()).await;
        assert_eq!(result.into_override(), Some(cached));
    }
}
