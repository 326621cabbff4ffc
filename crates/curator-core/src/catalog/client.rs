//! WordPress.org plugin catalog client.
//!
//! Lookups are issued one at a time with a fixed pause between consecutive
//! requests. Batch operations never abort early: every slug is attempted and
//! failures are collected alongside successes.

use super::types::{CatalogEntry, FetchOutcome, VerificationReport};
use crate::config::NetworkConfig;
use crate::network::{extract_domain, HttpClient};
use crate::observer::{Component, DynObserver};
use crate::slug::Slug;
use crate::{CuratorError, Result};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Path of the plugin information endpoint under the catalog base.
const PLUGIN_INFO_PATH: &str = "/plugins/info/1.2/";

/// Extended fields requested for every lookup.
pub const EXTENDED_FIELDS: &[&str] = &[
    "description",
    "short_description",
    "ratings",
    "rating",
    "num_ratings",
    "active_installs",
    "downloaded",
    "icons",
    "banners",
    "last_updated",
    "version",
    "tested",
    "requires",
];

/// Client for per-slug catalog lookups.
pub struct CatalogClient {
    http: HttpClient,
    base_url: String,
    request_delay: Duration,
    observer: DynObserver,
}

impl CatalogClient {
    /// Create a client against the public WordPress.org catalog.
    pub fn new(observer: DynObserver) -> Result<Self> {
        let http = HttpClient::with_timeout(NetworkConfig::CATALOG_REQUEST_TIMEOUT)?;
        Ok(Self {
            http,
            base_url: NetworkConfig::CATALOG_API_BASE.to_string(),
            request_delay: NetworkConfig::CATALOG_REQUEST_DELAY,
            observer,
        })
    }

    /// Point the client at a different catalog host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the pause between consecutive requests.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn request_delay(&self) -> Duration {
        self.request_delay
    }

    /// Full URL of the plugin information endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, PLUGIN_INFO_PATH)
    }

    fn query_for(slug: &Slug) -> Vec<(String, String)> {
        let mut query = Vec::with_capacity(EXTENDED_FIELDS.len() + 2);
        query.push(("action".to_string(), "plugin_information".to_string()));
        query.push(("request[slug]".to_string(), slug.to_string()));
        for field in EXTENDED_FIELDS {
            query.push((format!("request[fields][{}]", field), "1".to_string()));
        }
        query
    }

    /// Look up one slug.
    pub async fn fetch_one(&self, slug: &Slug) -> Result<CatalogEntry> {
        self.lookup(slug).await.map_err(|e| {
            self.observer
                .on_error(e.kind(), &e.to_string(), Component::CatalogClient);
            e
        })
    }

    async fn lookup(&self, slug: &Slug) -> Result<CatalogEntry> {
        let endpoint = self.endpoint();
        let response = self
            .http
            .get_with_query(&endpoint, &Self::query_for(slug))
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CuratorError::NotFound {
                slug: slug.to_string(),
            });
        }
        if !status.is_success() {
            return Err(CuratorError::Network {
                message: format!("Catalog returned HTTP {} for {}", status.as_u16(), slug),
                status_code: Some(status.as_u16()),
            });
        }

        let body = response.bytes().await.map_err(|e| CuratorError::Network {
            message: format!("Failed to read catalog response for {}: {}", slug, e),
            status_code: Some(status.as_u16()),
        })?;

        serde_json::from_slice::<CatalogEntry>(&body).map_err(|e| CuratorError::InvalidResponse {
            slug: slug.to_string(),
            message: e.to_string(),
        })
    }

    /// Look up every slug, collecting successes and failures.
    pub async fn fetch_many(&self, slugs: &[Slug]) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();

        for (i, slug) in slugs.iter().enumerate() {
            self.pause_between(i).await;
            match self.fetch_one(slug).await {
                Ok(entry) => outcome.entries.push(entry),
                Err(e) => {
                    debug!("Skipping {}: {}", slug, e);
                    outcome.record_failure(slug.clone(), e.kind());
                }
            }
        }

        if !outcome.failed.is_empty() {
            let failed: Vec<&str> = outcome.failed.iter().map(Slug::as_str).collect();
            warn!(
                "Failed to fetch {} plugins: {}",
                outcome.failed.len(),
                failed.join(", ")
            );
        }
        info!(
            "Catalog fetch from {}: {} of {} plugins resolved",
            extract_domain(&self.base_url),
            outcome.entries.len(),
            slugs.len()
        );

        self.observer.on_fetched(&outcome.entries, &outcome.failed);
        outcome
    }

    /// Check which slugs exist in the catalog.
    pub async fn verify_many(&self, slugs: &[Slug]) -> VerificationReport {
        let mut report = VerificationReport::default();

        for (i, slug) in slugs.iter().enumerate() {
            self.pause_between(i).await;
            match self.fetch_one(slug).await {
                Ok(_) => report.valid.push(slug.clone()),
                Err(_) => report.invalid.push(slug.clone()),
            }
        }

        debug!(
            "Verified {} slugs: {} valid, {} invalid",
            slugs.len(),
            report.valid.len(),
            report.invalid.len()
        );
        report
    }

    async fn pause_between(&self, index: usize) {
        if index > 0 && !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }
}
