//! Observer interface for cross-cutting notifications.
//!
//! Components report failures and fetch results through an injected
//! [`CurationObserver`] instead of a host event bus.

use crate::catalog::CatalogEntry;
use crate::error::ErrorKind;
use crate::slug::Slug;
use std::sync::Arc;
use tracing::{info, warn};

/// Pipeline component that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    RemoteSource,
    CatalogClient,
    PluginFilter,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::RemoteSource => "remote_source",
            Component::CatalogClient => "api_client",
            Component::PluginFilter => "plugin_filter",
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives error and fetch notifications from the pipeline.
///
/// Both methods default to doing nothing.
pub trait CurationObserver: Send + Sync {
    /// Called whenever a component swallows or reports a failure.
    fn on_error(&self, _kind: ErrorKind, _message: &str, _component: Component) {}

    /// Called after a batch catalog fetch completes.
    fn on_fetched(&self, _entries: &[CatalogEntry], _failed: &[Slug]) {}
}

/// Shared observer handle.
pub type DynObserver = Arc<dyn CurationObserver>;

/// Observer that ignores every notification.
pub struct NoopObserver;

impl CurationObserver for NoopObserver {}

/// Observer that forwards notifications to `tracing`.
pub struct TracingObserver;

impl CurationObserver for TracingObserver {
    fn on_error(&self, kind: ErrorKind, message: &str, component: Component) {
        warn!(component = component.as_str(), kind = kind.as_str(), "{}", message);
    }

    fn on_fetched(&self, entries: &[CatalogEntry], failed: &[Slug]) {
        info!(
            fetched = entries.len(),
            failed = failed.len(),
            "Catalog fetch finished"
        );
    }
}

/// The observer used when none is injected.
pub fn default_observer() -> DynObserver {
    Arc::new(TracingObserver)
}
