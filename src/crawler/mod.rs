//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Page fetching over HTTP or through a headless browser
//! - HTML content and link extraction
//! - Same-origin frontier tracking
//! - Optional OCR of page images
//! - The crawl engine that ties them together

mod engine;
mod extractor;
mod fetcher;
mod frontier;
mod ocr;
mod session;

pub use engine::{CrawlEngine, ProgressUpdate};
pub use extractor::{extract_content, ExtractedPage};
pub use fetcher::{
    build_fetcher, build_http_client, BrowserFetcher, FetchedPage, HttpFetcher, PageFetcher,
};
pub use frontier::{CrawlTarget, FrontierTracker};
pub use ocr::{TesseractCli, TextRecognizer};
pub use session::{CrawlOutcome, CrawlSession, SessionStats};

use crate::config::{CrawlOptions, FetchConfig};
use crate::FetchError;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl with the configured fetcher and OCR engine
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the page fetcher for the configured renderer
/// 2. Attach the OCR engine when image OCR is enabled
/// 3. Walk the site until the frontier is empty or `cancel` fires
///
/// # Arguments
///
/// * `options` - Resolved crawl options
/// * `fetch` - Fetcher and OCR settings
/// * `cancel` - Token that stops the crawl between pages
/// * `events` - Optional channel receiving a [`ProgressUpdate`] per page
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Results and summary, possibly partial if cancelled
/// * `Err(GleanerError)` - The crawl could not start
pub async fn crawl(
    options: CrawlOptions,
    fetch: &FetchConfig,
    cancel: CancellationToken,
    events: Option<UnboundedSender<ProgressUpdate>>,
) -> crate::Result<CrawlOutcome> {
    let fetcher = build_fetcher(fetch).map_err(|source| FetchError::Http {
        url: options.seed.to_string(),
        source,
    })?;

    let mut engine = CrawlEngine::new(fetcher).with_cancellation(cancel);
    if options.ocr {
        engine = engine.with_recognizer(Arc::new(TesseractCli::new(&fetch.ocr_binary)));
    }
    if let Some(events) = events {
        engine = engine.with_events(events);
    }

    engine.crawl(options).await
}
