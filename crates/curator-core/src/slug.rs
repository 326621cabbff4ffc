//! Plugin slug type and validation.
//!
//! A slug is a non-empty token of lowercase ASCII letters, digits and hyphens.
//! Input is case-insensitive: it is trimmed and lowercased before matching,
//! and anything still outside the allowed charset is rejected rather than
//! rewritten into a different slug.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Accepted slug shape.
static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("slug regex must compile"));

/// A validated catalog identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Normalize and validate a raw slug.
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_core::Slug;
    ///
    /// assert_eq!(Slug::parse(" Akismet ").unwrap().as_str(), "akismet");
    /// assert!(Slug::parse("bad slug!").is_none());
    /// assert!(Slug::parse("").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        if SLUG_PATTERN.is_match(&normalized) {
            Some(Slug(normalized))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Slug {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Slug::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid plugin slug '{}'", raw)))
    }
}

/// Validate raw strings into a deduplicated slug list.
///
/// The first occurrence of each slug keeps its position; malformed entries
/// are dropped silently.
pub fn validate_slugs<I, S>(raw: I) -> Vec<Slug>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|entry| Slug::parse(entry.as_ref()))
        .filter(|slug| seen.insert(slug.clone()))
        .collect()
}

/// Validate entries of a parsed JSON array.
///
/// Non-string entries are treated as malformed.
pub fn validate_values(values: &[Value]) -> Vec<Slug> {
    validate_slugs(values.iter().filter_map(Value::as_str))
}
