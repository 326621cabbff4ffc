//! Identifier source: the remote curated slug document.

mod document;
mod remote;

pub use document::RemoteDocument;
pub use remote::{ConnectionTestReport, RemoteSource, SlugCounts};
