//! Plugin catalog lookups.

mod client;
mod types;

pub use client::{CatalogClient, EXTENDED_FIELDS};
pub use types::{CatalogEntry, FetchOutcome, VerificationReport};
