//! In-memory result storage for a crawl session
//!
//! This module holds the records produced by the crawl engine and the
//! aggregator that appends them. The aggregated [`ResultSet`] is append-only
//! while the crawl runs and read-only during export.

mod aggregator;
mod records;

pub use aggregator::ResultAggregator;
pub use records::{
    contains_ignore_case, Category, ImageEntry, PageRecord, ResultEntry, ResultSet, TextRecord,
};
