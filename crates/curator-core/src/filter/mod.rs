//! Featured-listing interception and response assembly.

mod assembler;
mod types;

pub use assembler::PluginFilter;
pub use types::{
    build_response, BrowseResponse, FallbackReason, Interception, PageInfo, PartialStatus,
    PluginQuery, FEATURED_BROWSE, QUERY_PLUGINS_ACTION,
};
