//! Error types for the curator library.
//!
//! Every failure the pipeline can observe has a named variant here, so that
//! "absent", "expired" and "malformed" are never folded into one sentinel.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the curator library.
#[derive(Debug, Error)]
pub enum CuratorError {
    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// HTTP status when the server answered with a non-success code.
        status_code: Option<u16>,
    },

    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    #[error("No valid plugin slugs found after validation")]
    NoValidData,

    // Catalog errors
    #[error("Plugin not found in catalog: {slug}")]
    NotFound { slug: String },

    #[error("Invalid catalog response for {slug}: {message}")]
    InvalidResponse { slug: String, message: String },

    // Storage errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // RPC errors
    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for curator operations.
pub type Result<T> = std::result::Result<T, CuratorError>;

/// Coarse classification of a failure, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Validation,
    Network,
    Parse,
    NoValidData,
    NotFound,
    InvalidResponse,
    Storage,
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Validation => "validation",
            ErrorKind::Network => "network",
            ErrorKind::Parse => "parse",
            ErrorKind::NoValidData => "no_valid_data",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidResponse => "invalid_response",
            ErrorKind::Storage => "storage",
            ErrorKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<std::io::Error> for CuratorError {
    fn from(err: std::io::Error) -> Self {
        CuratorError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for CuratorError {
    fn from(err: serde_json::Error) -> Self {
        CuratorError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for CuratorError {
    fn from(err: rusqlite::Error) -> Self {
        CuratorError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for CuratorError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else {
            err.to_string()
        };
        CuratorError::Network {
            message,
            status_code: err.status().map(|s| s.as_u16()),
        }
    }
}

impl CuratorError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        CuratorError::Config {
            message: message.into(),
        }
    }

    /// Create a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CuratorError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Classify this error for observers and logs.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CuratorError::Config { .. } => ErrorKind::Configuration,
            CuratorError::Validation { .. } | CuratorError::InvalidParams { .. } => {
                ErrorKind::Validation
            }
            CuratorError::Network { .. } => ErrorKind::Network,
            CuratorError::Parse { .. } | CuratorError::Json { .. } => ErrorKind::Parse,
            CuratorError::NoValidData => ErrorKind::NoValidData,
            CuratorError::NotFound { .. } => ErrorKind::NotFound,
            CuratorError::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            CuratorError::Database { .. } | CuratorError::Io { .. } => ErrorKind::Storage,
            CuratorError::Other(_) => ErrorKind::Other,
        }
    }

    /// Convert to a JSON-RPC error code.
    ///
    /// Standard codes:
    /// - -32602: Invalid method parameters
    /// - -32700: Undecodable payload (remote document or JSON)
    /// - -32603: Internal error (storage and everything else)
    ///
    /// Custom error codes (application-defined, -32000 to -32099):
    /// - -32000: Network/connectivity error or malformed catalog record
    /// - -32002: Plugin not found
    /// - -32005: Validation, configuration or empty slug list
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            CuratorError::InvalidParams { .. } => -32602,

            CuratorError::Network { .. } | CuratorError::InvalidResponse { .. } => -32000,

            CuratorError::NotFound { .. } => -32002,

            CuratorError::Config { .. }
            | CuratorError::Validation { .. }
            | CuratorError::NoValidData => -32005,

            CuratorError::Parse { .. } | CuratorError::Json { .. } => -32700,

            _ => -32603,
        }
    }
}
