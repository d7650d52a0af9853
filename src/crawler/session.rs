//! Per-crawl state
//!
//! A `CrawlSession` owns everything that changes during one crawl: the visited
//! set, the pending work queue, the aggregated results and the progress
//! window. Nothing is process-wide, so independent crawls never share state.

use crate::config::CrawlOptions;
use crate::crawler::frontier::{CrawlTarget, FrontierTracker};
use crate::output::CrawlSummary;
use crate::state::ProgressEstimator;
use crate::storage::{ResultAggregator, ResultSet};
use crate::ConfigError;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Counters kept while the crawl runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub pages_fetched: u64,
    pub pages_failed: u64,
    pub ocr_failures: u64,
}

/// State of one crawl, passed explicitly through the engine
#[derive(Debug)]
pub struct CrawlSession {
    options: CrawlOptions,
    pub(crate) frontier: FrontierTracker,
    pub(crate) queue: VecDeque<CrawlTarget>,
    pub(crate) results: ResultAggregator,
    pub(crate) progress: ProgressEstimator,
    pub(crate) stats: SessionStats,
    pub(crate) cancelled: bool,
    started_at: DateTime<Utc>,
}

impl CrawlSession {
    /// Creates a session whose frontier holds only the seed
    ///
    /// # Returns
    ///
    /// * `Err(ConfigError::InvalidUrl)` - The seed can never be admitted
    pub fn new(options: CrawlOptions) -> Result<Self, ConfigError> {
        let frontier = FrontierTracker::new(&options.seed);
        let seed = frontier.admit_target(&options.seed).ok_or_else(|| {
            ConfigError::InvalidUrl(format!("'{}' is not a crawlable URL", options.seed))
        })?;

        Ok(Self {
            options,
            frontier,
            queue: VecDeque::from([seed]),
            results: ResultAggregator::new(),
            progress: ProgressEstimator::new(),
            stats: SessionStats::default(),
            cancelled: false,
            started_at: Utc::now(),
        })
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// Pops the next frontier entry (breadth-first)
    pub(crate) fn next_target(&mut self) -> Option<CrawlTarget> {
        self.queue.pop_front()
    }

    /// Number of admitted URLs not yet fetched
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Consumes the session, producing the final results and summary
    pub fn finish(self) -> CrawlOutcome {
        let results = self.results.into_results();

        let summary = CrawlSummary {
            seed: self.options.seed.to_string(),
            started_at: self.started_at,
            finished_at: Utc::now(),
            pages_admitted: self.frontier.visited_count() as u64,
            pages_fetched: self.stats.pages_fetched,
            pages_failed: self.stats.pages_failed,
            pages_pending: self.queue.len() as u64,
            text_records: results.text.len() as u64,
            image_records: results.images.len() as u64,
            video_records: results.videos.len() as u64,
            ocr_failures: self.stats.ocr_failures,
            cancelled: self.cancelled,
        };

        CrawlOutcome { results, summary }
    }
}

/// Final output of a crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub results: ResultSet,
    pub summary: CrawlSummary,
}
