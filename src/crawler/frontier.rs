//! Visited-set bookkeeping and same-origin admission

use crate::url::{normalize_url, origin_label, resolve_link, same_origin, visit_key};
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// A URL admitted to the crawl, plus the origin it was admitted under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Normalized absolute URL, exactly as it will be requested
    pub url: Url,

    /// Serialized origin, e.g. `https://example.com`
    pub origin: String,
}

/// Owns the visited set and the same-origin admission rule
///
/// Membership test and insertion happen under one lock, so two concurrent
/// discoveries of the same link can never both be admitted.
#[derive(Debug)]
pub struct FrontierTracker {
    seed: Url,
    visited: Mutex<HashSet<String>>,
}

impl FrontierTracker {
    /// Creates a tracker bounded to the origin of `seed`
    ///
    /// The seed itself is not admitted; call [`admit_target`](Self::admit_target)
    /// on it to start the crawl.
    pub fn new(seed: &Url) -> Self {
        Self {
            seed: seed.clone(),
            visited: Mutex::new(HashSet::new()),
        }
    }

    /// Admits `url` if it is same-origin and unseen, recording it as visited
    ///
    /// Returns false, with no state change, for cross-origin, already
    /// visited, or non-HTTP(S) URLs.
    pub fn admit(&self, url: &Url) -> bool {
        self.admit_target(url).is_some()
    }

    /// Like [`admit`](Self::admit), returning the normalized target on success
    pub fn admit_target(&self, url: &Url) -> Option<CrawlTarget> {
        let normalized = normalize_url(url)?;

        if !self.in_scope(&normalized) {
            tracing::trace!("Rejecting cross-origin URL {}", normalized);
            return None;
        }

        let inserted = self
            .visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(visit_key(&normalized));

        if !inserted {
            return None;
        }

        tracing::debug!("Admitted {}", normalized);
        Some(CrawlTarget {
            origin: origin_label(&normalized),
            url: normalized,
        })
    }

    /// Resolves `href` against the referring page, then admits it
    pub fn admit_link(&self, href: &str, referrer: &Url) -> Option<CrawlTarget> {
        let resolved = resolve_link(href, referrer)?;
        self.admit_target(&resolved)
    }

    /// Returns true if `url` (after normalization) was already admitted
    pub fn is_visited(&self, url: &Url) -> bool {
        normalize_url(url).map_or(false, |normalized| {
            self.visited
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(&visit_key(&normalized))
        })
    }

    /// Returns true if `url` shares the seed's origin
    pub fn in_scope(&self, url: &Url) -> bool {
        same_origin(url, &self.seed)
    }

    /// Returns true if `a` and `b` map to the same visited-set entry
    pub fn same_page(a: &Url, b: &Url) -> bool {
        match (normalize_url(a), normalize_url(b)) {
            (Some(a), Some(b)) => visit_key(&a) == visit_key(&b),
            _ => false,
        }
    }

    /// Number of URLs admitted so far
    pub fn visited_count(&self) -> usize {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
