//! URL handling module for Site-Gleaner
//!
//! This module provides link resolution, visited-set normalization and the
//! same-origin rule that bounds a crawl.

mod normalize;
mod origin;

// Re-export main functions
pub use normalize::{normalize_url, resolve_link, visit_key};
pub use origin::{origin_label, same_origin};
