//! Remote slug source.
//!
//! Fetches the curated slug document, validates it and keeps the validated
//! list in the cache store under [`CacheKey::Slugs`].

use super::document::RemoteDocument;
use crate::cache::{CacheKey, CacheStore};
use crate::config::{validate_remote_url, CuratorConfig, NetworkConfig};
use crate::network::HttpClient;
use crate::observer::{Component, DynObserver};
use crate::slug::{validate_values, Slug};
use crate::{CuratorError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Entry counts gathered during a connection test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugCounts {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

/// Outcome of [`RemoteSource::test_connection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTestReport {
    pub success: bool,
    pub message: String,
    pub counts: SlugCounts,
    /// Validated slugs, empty when the fetch failed.
    pub slugs: Vec<Slug>,
}

impl ConnectionTestReport {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            counts: SlugCounts::default(),
            slugs: Vec::new(),
        }
    }
}

/// Source of the curated slug list.
pub struct RemoteSource {
    config: CuratorConfig,
    http: HttpClient,
    cache: CacheStore,
    observer: DynObserver,
}

impl RemoteSource {
    pub fn new(config: CuratorConfig, cache: CacheStore, observer: DynObserver) -> Result<Self> {
        let http = HttpClient::with_timeout(NetworkConfig::REMOTE_FETCH_TIMEOUT)?;
        Ok(Self::with_http_client(config, http, cache, observer))
    }

    pub fn with_http_client(
        config: CuratorConfig,
        http: HttpClient,
        cache: CacheStore,
        observer: DynObserver,
    ) -> Self {
        Self {
            config,
            http,
            cache,
            observer,
        }
    }

    /// Get the validated slug list.
    ///
    /// Order of operations:
    /// 1. Cached list, unless `force_refresh`
    /// 2. Fetch and parse the remote document
    /// 3. Validate; an empty result is [`CuratorError::NoValidData`]
    /// 4. Cache the validated list with the default TTL
    pub async fn get_slugs(&self, force_refresh: bool) -> Result<Vec<Slug>> {
        if !force_refresh {
            if let Some(slugs) = self.cache.get::<Vec<Slug>>(CacheKey::Slugs) {
                debug!("Slug cache hit ({} slugs)", slugs.len());
                return Ok(slugs);
            }
        }

        let entries = self.fetch_remote_entries().await?;
        let slugs = validate_values(&entries);

        if slugs.is_empty() {
            return Err(self.report(CuratorError::NoValidData));
        }

        if let Err(e) = self.cache.set(CacheKey::Slugs, &slugs) {
            warn!("Failed to cache validated slugs: {}", e);
        }

        info!(
            "Fetched {} valid slugs ({} entries in remote document)",
            slugs.len(),
            entries.len()
        );
        Ok(slugs)
    }

    /// Fetch the remote document without touching the cache and report
    /// what it contains.
    pub async fn test_connection(&self) -> ConnectionTestReport {
        let entries = match self.fetch_remote_entries().await {
            Ok(entries) => entries,
            Err(CuratorError::Config { message }) => return ConnectionTestReport::failure(message),
            Err(e) => {
                return ConnectionTestReport::failure(format!(
                    "Failed to fetch data from remote source: {}",
                    e
                ))
            }
        };

        let slugs = validate_values(&entries);
        let counts = SlugCounts {
            total: entries.len(),
            valid: slugs.len(),
            invalid: entries.len() - slugs.len(),
        };

        ConnectionTestReport {
            success: true,
            message: format!("Successfully fetched {} plugin slugs", counts.valid),
            counts,
            slugs,
        }
    }

    async fn fetch_remote_entries(&self) -> Result<Vec<Value>> {
        let remote_url = self
            .config
            .remote_url()
            .ok_or_else(|| self.report(CuratorError::config("Remote URL not configured")))?;

        let url = validate_remote_url(remote_url).map_err(|e| self.report(e))?;

        let mut headers = vec![("Accept", "application/json".to_string())];
        if let Some(api_key) = self.config.api_key() {
            headers.push(("Authorization", format!("Bearer {}", api_key)));
        }

        let response = self
            .http
            .get_with_headers(url.as_str(), &headers)
            .await
            .map_err(|e| self.report(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(self.report(CuratorError::Network {
                message: format!("Remote server returned HTTP {}", status.as_u16()),
                status_code: Some(status.as_u16()),
            }));
        }

        let body = response.bytes().await.map_err(|e| {
            self.report(CuratorError::Network {
                message: format!("Failed to read remote response: {}", e),
                status_code: Some(status.as_u16()),
            })
        })?;

        let document = RemoteDocument::parse(&body).map_err(|e| {
            self.report(CuratorError::Parse {
                what: "remote slug document".to_string(),
                message: e.to_string(),
            })
        })?;

        if document == RemoteDocument::Unrecognized {
            debug!("Remote document has an unrecognized shape, extracting no slugs");
        }

        Ok(document.into_entries())
    }

    fn report(&self, err: CuratorError) -> CuratorError {
        self.observer
            .on_error(err.kind(), &err.to_string(), Component::RemoteSource);
        err
    }
}
