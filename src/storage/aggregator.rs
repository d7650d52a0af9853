//! Serialized appends into the crawl's result set

use crate::storage::records::{PageRecord, ResultEntry, ResultSet, TextRecord};
use std::sync::{Mutex, PoisonError};

/// Accumulates extracted records for one crawl session
///
/// Appends go through a mutex so the aggregator can be shared by reference.
/// No deduplication happens here; the frontier already guarantees each page
/// is recorded at most once.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: Mutex<ResultSet>,
    pages: Mutex<usize>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry to the sequence for its category
    pub fn record(&self, entry: ResultEntry) {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Takes ownership of a page's output and appends its parts
    ///
    /// Page text is appended only when `keep_text` is set (the page passed the
    /// keyword filter); images and videos are always appended.
    pub fn record_page(&self, page: PageRecord, keep_text: bool) {
        let mut results = self.results.lock().unwrap_or_else(PoisonError::into_inner);

        if keep_text {
            results.push(ResultEntry::Text(TextRecord {
                url: page.url,
                title: page.title,
                description: page.description,
                content: page.text,
            }));
        }

        for image in page.images {
            results.push(ResultEntry::Image(image));
        }

        for video in page.videos {
            results.push(ResultEntry::Video(video));
        }

        *self.pages.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    /// Number of pages handed to [`record_page`](Self::record_page)
    pub fn pages_recorded(&self) -> usize {
        *self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current result set
    pub fn snapshot(&self) -> ResultSet {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Consumes the aggregator, yielding the final result set
    pub fn into_results(self) -> ResultSet {
        self.results
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
