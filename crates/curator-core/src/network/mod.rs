//! Network utilities shared by the remote source and the catalog client.

mod client;

pub use client::{extract_domain, HttpClient};
