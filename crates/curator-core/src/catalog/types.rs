//! Catalog data types.

use crate::error::ErrorKind;
use crate::slug::Slug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One plugin record from the catalog.
///
/// Only `slug` is interpreted; every other field the catalog returns is kept
/// as-is so responses reach consumers unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub slug: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CatalogEntry {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field insertion, mostly for tests and fixtures.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Display name, when the catalog provided one.
    pub fn name(&self) -> Option<&str> {
        self.field("name").and_then(Value::as_str)
    }
}

/// Result of a batch catalog fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchOutcome {
    /// Successfully fetched entries, in request order.
    pub entries: Vec<CatalogEntry>,
    /// Slugs whose lookup failed, in request order.
    pub failed: Vec<Slug>,
    /// Kind shared by every failure, or `Other` when they differ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<ErrorKind>,
}

impl FetchOutcome {
    pub fn record_failure(&mut self, slug: Slug, kind: ErrorKind) {
        self.failed.push(slug);
        self.failure_kind = match self.failure_kind {
            None => Some(kind),
            Some(seen) if seen == kind => Some(seen),
            Some(_) => Some(ErrorKind::Other),
        };
    }

    pub fn requested(&self) -> usize {
        self.entries.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of an existence check over several slugs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub valid: Vec<Slug>,
    pub invalid: Vec<Slug>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_keeps_unknown_fields() {
        let raw = json!({
            "slug": "akismet",
            "name": "Akismet Anti-spam",
            "version": "5.3",
            "ratings": {"5": 900, "1": 12},
            "icons": {"1x": "https://ps.w.org/akismet/assets/icon-128x128.png"}
        });

        let entry: CatalogEntry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entry.slug, "akismet");
        assert_eq!(entry.name(), Some("Akismet Anti-spam"));
        assert_eq!(entry.field("version"), Some(&json!("5.3")));
        assert!(!entry.fields.contains_key("slug"));

        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn test_entry_requires_slug() {
        assert!(serde_json::from_value::<CatalogEntry>(json!({"name": "No slug"})).is_err());
        assert!(serde_json::from_value::<CatalogEntry>(json!({"slug": null})).is_err());
    }

    #[test]
    fn test_fetch_outcome_counts() {
        let mut outcome = FetchOutcome {
            entries: vec![CatalogEntry::new("a")],
            ..Default::default()
        };
        assert!(outcome.is_complete());
        assert_eq!(outcome.failure_kind, None);

        outcome.record_failure(Slug::parse("b").unwrap(), ErrorKind::NotFound);
        assert_eq!(outcome.requested(), 2);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.failure_kind, Some(ErrorKind::NotFound));
    }

    #[test]
    fn test_failure_kind_tracks_agreement() {
        let mut outcome = FetchOutcome::default();
        outcome.record_failure(Slug::parse("a").unwrap(), ErrorKind::Network);
        outcome.record_failure(Slug::parse("b").unwrap(), ErrorKind::Network);
        assert_eq!(outcome.failure_kind, Some(ErrorKind::Network));

        outcome.record_failure(Slug::parse("c").unwrap(), ErrorKind::InvalidResponse);
        assert_eq!(outcome.failure_kind, Some(ErrorKind::Other));
        assert_eq!(outcome.failed.len(), 3);
    }
}
