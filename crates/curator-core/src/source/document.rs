//! Shapes accepted for the remote slug document.

use serde_json::Value;

/// Parsed remote document.
///
/// Two layouts are recognized: a bare JSON array of slugs, or an object
/// carrying the array under `plugins`. Anything else is `Unrecognized` and
/// extracts to nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteDocument {
    List(Vec<Value>),
    Envelope { plugins: Vec<Value> },
    Unrecognized,
}

impl RemoteDocument {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => RemoteDocument::List(items),
            Value::Object(mut map) => match map.remove("plugins") {
                Some(Value::Array(plugins)) => RemoteDocument::Envelope { plugins },
                _ => RemoteDocument::Unrecognized,
            },
            _ => RemoteDocument::Unrecognized,
        }
    }

    /// Parse a response body.
    pub fn parse(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body).map(Self::from_value)
    }

    /// Raw entries, before validation.
    pub fn into_entries(self) -> Vec<Value> {
        match self {
            RemoteDocument::List(items) => items,
            RemoteDocument::Envelope { plugins } => plugins,
            RemoteDocument::Unrecognized => Vec::new(),
        }
    }
}
