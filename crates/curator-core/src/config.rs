//! Configuration for the curator library.
//!
//! Settings are owned by whatever host stores them; the core only ever sees
//! an explicit [`CuratorConfig`] value handed to its constructors.

use crate::error::{CuratorError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const USER_AGENT: &'static str = "Plugin-Curator/0.2";
    pub const REMOTE_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
    pub const CATALOG_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    /// Fixed pause between consecutive catalog requests.
    pub const CATALOG_REQUEST_DELAY: Duration = Duration::from_millis(100);
    pub const CATALOG_API_BASE: &'static str = "https://api.wordpress.org";
}

/// Cache-related configuration.
pub struct CacheConfig;

impl CacheConfig {
    /// Default time-to-live for cached slugs and responses (6 hours).
    pub const DEFAULT_TTL_SECS: u64 = 6 * 60 * 60;
    pub const DB_FILENAME: &'static str = "curator-cache.sqlite";
}

/// Cache duration presets offered to administrators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheDuration {
    OneHour,
    ThreeHours,
    #[default]
    SixHours,
    TwelveHours,
    OneDay,
}

impl CacheDuration {
    pub const ALL: [CacheDuration; 5] = [
        CacheDuration::OneHour,
        CacheDuration::ThreeHours,
        CacheDuration::SixHours,
        CacheDuration::TwelveHours,
        CacheDuration::OneDay,
    ];

    pub fn as_duration(&self) -> Duration {
        let hours = match self {
            CacheDuration::OneHour => 1,
            CacheDuration::ThreeHours => 3,
            CacheDuration::SixHours => 6,
            CacheDuration::TwelveHours => 12,
            CacheDuration::OneDay => 24,
        };
        Duration::from_secs(hours * 60 * 60)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CacheDuration::OneHour => "1 Hour",
            CacheDuration::ThreeHours => "3 Hours",
            CacheDuration::SixHours => "6 Hours",
            CacheDuration::TwelveHours => "12 Hours",
            CacheDuration::OneDay => "24 Hours",
        }
    }

    /// Match a TTL in seconds against the presets.
    pub fn from_secs(secs: u64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_duration().as_secs() == secs)
    }
}

/// Injected settings read by the identifier source and the cache store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuratorConfig {
    /// URL of the remote JSON document listing curated slugs.
    #[serde(default)]
    pub remote_url: Option<String>,
    /// Optional bearer credential for the remote document.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Default TTL for cache writes.
    #[serde(default = "default_cache_ttl", with = "duration_secs")]
    pub cache_ttl: Duration,
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(CacheConfig::DEFAULT_TTL_SECS)
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            api_key: None,
            cache_ttl: default_cache_ttl(),
        }
    }
}

impl CuratorConfig {
    pub fn new(remote_url: impl Into<String>) -> Self {
        Self {
            remote_url: Some(remote_url.into()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// The configured remote URL, treating blank strings as unset.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// The configured API key, treating blank strings as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Validate that a URL is well-formed and uses http or https.
pub fn validate_remote_url(raw: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| {
        CuratorError::validation("remote_url", format!("invalid URL '{}': {}", raw, e))
    })?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        scheme => Err(CuratorError::validation(
            "remote_url",
            format!("unsupported URL '{}' (scheme '{}'), expected http or https", raw, scheme),
        )),
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
