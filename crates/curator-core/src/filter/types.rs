//! Query and response types for the featured-listing interception.

use crate::catalog::CatalogEntry;
use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Action name of a plugin listing query.
pub const QUERY_PLUGINS_ACTION: &str = "query_plugins";

/// Browse tab the curated listing replaces.
pub const FEATURED_BROWSE: &str = "featured";

/// A plugin listing query as issued by the consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginQuery {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browse: Option<String>,
    /// Any other query arguments (page, per_page, fields, ...), ignored here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PluginQuery {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_browse(mut self, browse: impl Into<String>) -> Self {
        self.browse = Some(browse.into());
        self
    }

    /// The query the curated listing answers.
    pub fn featured() -> Self {
        Self::new(QUERY_PLUGINS_ACTION).with_browse(FEATURED_BROWSE)
    }

    pub fn is_featured_listing(&self) -> bool {
        self.action == QUERY_PLUGINS_ACTION && self.browse.as_deref() == Some(FEATURED_BROWSE)
    }
}

/// Paging block of a listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u32,
    pub pages: u32,
    pub results: usize,
}

/// Listing response in the consumer's native shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseResponse {
    #[serde(alias = "entries")]
    pub plugins: Vec<CatalogEntry>,
    pub info: PageInfo,
}

/// Build a single-page response over `entries`.
pub fn build_response(entries: Vec<CatalogEntry>) -> BrowseResponse {
    let results = entries.len();
    BrowseResponse {
        plugins: entries,
        info: PageInfo {
            page: 1,
            pages: 1,
            results,
        },
    }
}

/// Bookkeeping written when fewer entries resolved than were requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialStatus {
    pub expected: usize,
    pub received: usize,
    pub missing: usize,
}

impl PartialStatus {
    /// `Some` only when `received < expected`.
    pub fn from_counts(expected: usize, received: usize) -> Option<Self> {
        (received < expected).then(|| Self {
            expected,
            received,
            missing: expected - received,
        })
    }
}

/// Why the curated listing was not served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FallbackReason {
    /// The slug list could not be resolved.
    SlugsUnavailable { kind: ErrorKind, message: String },
    /// No requested slug resolved in the catalog. `kind` classifies the
    /// lookup failures (`Other` when they differed).
    NoCatalogEntries { requested: usize, kind: ErrorKind },
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::SlugsUnavailable { kind, message } => {
                write!(f, "no slugs available ({}): {}", kind, message)
            }
            FallbackReason::NoCatalogEntries { requested, kind } => {
                write!(
                    f,
                    "none of {} plugins resolved in the catalog ({})",
                    requested, kind
                )
            }
        }
    }
}

/// Outcome of offering a query to the filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Interception {
    /// The query is not the featured listing; the consumer proceeds unchanged.
    NotApplicable,
    /// The consumer should show its own default listing.
    Fallback(FallbackReason),
    /// Serve this response instead of the default.
    Override(BrowseResponse),
}

impl Interception {
    pub fn into_override(self) -> Option<BrowseResponse> {
        match self {
            Interception::Override(response) => Some(response),
            _ => None,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, Interception::Override(_))
    }
}
