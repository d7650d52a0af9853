//! Crawl engine - main traversal loop
//!
//! This module contains the work loop that drives a crawl session:
//! - Popping admitted URLs from the frontier queue
//! - Fetching and extracting each page
//! - Applying the keyword filter and recording results
//! - Enqueueing newly admitted same-origin links
//! - Emitting progress and ETA updates
//!
//! The loop is driven by an explicit queue, never by recursion, so deep or
//! cyclic sites cannot exhaust the call stack.

use crate::config::CrawlOptions;
use crate::crawler::extractor::{extract_content, ExtractedPage};
use crate::crawler::fetcher::{FetchedPage, PageFetcher};
use crate::crawler::frontier::{CrawlTarget, FrontierTracker};
use crate::crawler::ocr::TextRecognizer;
use crate::crawler::session::{CrawlOutcome, CrawlSession};
use crate::state::CrawlPhase;
use crate::storage::{contains_ignore_case, ImageEntry, PageRecord};
use crate::{FetchError, GleanerError, OcrError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Progress report emitted after every recorded page
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// The page just recorded
    pub url: String,

    /// 1-based count of pages fetched so far
    pub page_number: u64,

    /// Seconds spent on this page's fetch, extract and record cycle
    pub page_seconds: f64,

    /// Admitted URLs still waiting in the frontier
    pub pending: usize,

    /// Pages fetched plus pages pending
    pub total_estimate: u64,

    /// Estimated seconds until the frontier drains
    pub eta_seconds: f64,
}

impl ProgressUpdate {
    pub fn eta_minutes(&self) -> f64 {
        self.eta_seconds / 60.0
    }

    /// Share of the running estimate completed, 0.0 to 100.0
    pub fn percent(&self) -> f64 {
        if self.total_estimate == 0 {
            return 100.0;
        }
        self.page_number as f64 / self.total_estimate as f64 * 100.0
    }
}

/// Drives a crawl session from seed to empty frontier
pub struct CrawlEngine {
    fetcher: Arc<dyn PageFetcher>,
    recognizer: Option<Arc<dyn TextRecognizer>>,
    events: Option<UnboundedSender<ProgressUpdate>>,
    cancel: CancellationToken,
    phase: CrawlPhase,
}

impl CrawlEngine {
    /// Creates an engine fetching pages through `fetcher`
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            recognizer: None,
            events: None,
            cancel: CancellationToken::new(),
            phase: CrawlPhase::Idle,
        }
    }

    /// Sets the OCR collaborator used when image OCR is enabled
    pub fn with_recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Sends a [`ProgressUpdate`] on `events` after every recorded page
    pub fn with_events(mut self, events: UnboundedSender<ProgressUpdate>) -> Self {
        self.events = Some(events);
        self
    }

    /// Stops the crawl between pages once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Current phase of the engine
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Runs a fresh session for `options` and returns its outcome
    pub async fn crawl(&mut self, options: CrawlOptions) -> crate::Result<CrawlOutcome> {
        let mut session = CrawlSession::new(options)?;
        self.run(&mut session).await?;
        Ok(session.finish())
    }

    /// Runs the main crawl loop until the session's frontier is empty
    ///
    /// Per-page failures are logged and skipped; they never abort the crawl.
    /// When cancelled, the loop stops before the next page and everything
    /// recorded so far stays in the session.
    pub async fn run(&mut self, session: &mut CrawlSession) -> crate::Result<()> {
        self.phase = CrawlPhase::Idle;

        tracing::info!(
            "Starting crawl of {} ({})",
            session.options().seed,
            if session.options().follows_links() {
                "whole site"
            } else {
                "single page"
            }
        );

        loop {
            if self.cancel.is_cancelled() {
                tracing::warn!(
                    "Crawl cancelled with {} pages still pending",
                    session.pending()
                );
                session.cancelled = true;
                self.advance(CrawlPhase::Done)?;
                break;
            }

            let target = match session.next_target() {
                Some(t) => t,
                None => {
                    tracing::info!("Frontier is empty, crawl complete");
                    self.advance(CrawlPhase::Done)?;
                    break;
                }
            };

            self.process_target(session, target).await?;
        }

        let stats = session.stats();
        tracing::info!(
            "Crawl finished: {} pages fetched, {} failed",
            stats.pages_fetched,
            stats.pages_failed
        );

        Ok(())
    }

    /// Processes a single frontier entry through every phase
    async fn process_target(
        &mut self,
        session: &mut CrawlSession,
        target: CrawlTarget,
    ) -> crate::Result<()> {
        let started = Instant::now();
        let options = session.options().clone();
        let url = target.url;

        self.advance(CrawlPhase::Fetching)?;
        let landed = self
            .fetch_page(&url, &options)
            .await
            .and_then(|page| Self::settle_redirect(session, &url, page));
        let (url, markup) = match landed {
            Ok(Some(page)) => (page.url, page.markup),
            Ok(None) => {
                self.advance(CrawlPhase::Idle)?;
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", url, e);
                session.stats.pages_failed += 1;
                self.advance(CrawlPhase::Idle)?;
                return Ok(());
            }
        };
        session.stats.pages_fetched += 1;

        self.advance(CrawlPhase::Extracting)?;
        let extracted = extract_content(&markup, &url);
        tracing::debug!(
            "Extracted {}: title={:?}, {} images, {} videos, {} links",
            url,
            extracted.title,
            extracted.images.len(),
            extracted.videos.len(),
            extracted.links.len()
        );

        let images = if options.images {
            self.collect_images(session, &extracted.images, &options)
                .await
        } else {
            Vec::new()
        };

        let videos = if options.videos {
            extracted.videos.iter().map(Url::to_string).collect()
        } else {
            Vec::new()
        };

        self.advance(CrawlPhase::Filtering)?;
        let keep_text = match options.keyword.as_deref() {
            Some(keyword) => contains_ignore_case(&extracted.text, keyword),
            None => true,
        };
        if keep_text {
            tracing::debug!("Recording text from {}", url);
        } else {
            tracing::debug!("Keyword not found on {}, text not recorded", url);
        }

        self.advance(CrawlPhase::Recording)?;
        let ExtractedPage {
            title,
            description,
            text,
            links,
            ..
        } = extracted;

        session.results.record_page(
            PageRecord {
                url: url.to_string(),
                title,
                description,
                text,
                images,
                videos,
            },
            keep_text,
        );

        if options.follows_links() {
            let mut admitted = 0;
            for link in &links {
                if let Some(next) = session.frontier.admit_target(link) {
                    session.queue.push_back(next);
                    admitted += 1;
                }
            }
            tracing::debug!("Admitted {} new links from {}", admitted, url);
        }

        let elapsed = started.elapsed();
        session.progress.observe_duration(elapsed);
        self.report_progress(session, &url, elapsed);

        self.advance(CrawlPhase::Idle)?;
        Ok(())
    }

    /// Decides which URL a fetched page is recorded and resolved under
    ///
    /// A page that redirected within the origin lives at its final URL, which
    /// is admitted to the visited set; `Ok(None)` means that URL was already
    /// crawled. Redirects off the origin are refused.
    fn settle_redirect(
        session: &CrawlSession,
        requested: &Url,
        page: FetchedPage,
    ) -> Result<Option<FetchedPage>, FetchError> {
        if FrontierTracker::same_page(requested, &page.url) {
            return Ok(Some(FetchedPage {
                url: requested.clone(),
                markup: page.markup,
            }));
        }

        if !session.frontier.in_scope(&page.url) {
            return Err(FetchError::CrossOriginRedirect {
                url: requested.to_string(),
                location: page.url.to_string(),
            });
        }

        match session.frontier.admit_target(&page.url) {
            Some(target) => {
                tracing::debug!("{} landed on {}", requested, target.url);
                Ok(Some(FetchedPage {
                    url: target.url,
                    markup: page.markup,
                }))
            }
            None => {
                tracing::debug!(
                    "{} redirected to already crawled {}, skipping",
                    requested,
                    page.url
                );
                Ok(None)
            }
        }
    }

    /// Fetches a page, bounded by the page timeout
    async fn fetch_page(&self, url: &Url, options: &CrawlOptions) -> Result<FetchedPage, FetchError> {
        match tokio::time::timeout(
            options.page_timeout,
            self.fetcher.fetch(url, options.render_visible),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                seconds: options.page_timeout.as_secs(),
            }),
        }
    }

    /// Builds image entries, running OCR on each when enabled
    ///
    /// OCR failures are degradations: the image is kept with empty text.
    async fn collect_images(
        &self,
        session: &mut CrawlSession,
        image_urls: &[Url],
        options: &CrawlOptions,
    ) -> Vec<ImageEntry> {
        let mut entries = Vec::with_capacity(image_urls.len());

        for image_url in image_urls {
            let extracted_text = if options.ocr {
                match self.recognize_image(image_url, options.page_timeout).await {
                    Ok(text) => Some(text),
                    Err(e) => {
                        tracing::warn!("OCR failed for {}: {}", image_url, e);
                        session.stats.ocr_failures += 1;
                        Some(String::new())
                    }
                }
            } else {
                None
            };

            entries.push(ImageEntry {
                image_url: image_url.to_string(),
                extracted_text,
            });
        }

        entries
    }

    /// Downloads one image and passes it to the recognizer
    async fn recognize_image(&self, image_url: &Url, timeout: Duration) -> Result<String, OcrError> {
        let recognizer = self
            .recognizer
            .as_ref()
            .ok_or_else(|| OcrError::Failed("no OCR engine configured".to_string()))?;

        let bytes = match tokio::time::timeout(timeout, self.fetcher.fetch_bytes(image_url)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(OcrError::Download(FetchError::Timeout {
                    url: image_url.to_string(),
                    seconds: timeout.as_secs(),
                }))
            }
        };

        match tokio::time::timeout(timeout, recognizer.recognize(&bytes)).await {
            Ok(result) => result,
            Err(_) => Err(OcrError::Timeout(timeout.as_secs())),
        }
    }

    /// Logs the page timing and ETA and forwards it to the event channel
    fn report_progress(&self, session: &CrawlSession, url: &Url, elapsed: Duration) {
        let completed = session.stats.pages_fetched;
        let pending = session.pending();
        let total_estimate = completed + pending as u64;
        let eta_seconds = session
            .progress
            .estimate_remaining(completed as usize, total_estimate as usize);

        let update = ProgressUpdate {
            url: url.to_string(),
            page_number: completed,
            page_seconds: elapsed.as_secs_f64(),
            pending,
            total_estimate,
            eta_seconds,
        };

        tracing::info!(
            "Page {} done in {:.2}s, {} pending, ~{:.2} min remaining: {}",
            update.page_number,
            update.page_seconds,
            update.pending,
            update.eta_minutes(),
            update.url
        );

        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is watching
            let _ = events.send(update);
        }
    }

    /// Moves the engine to `next`, rejecting transitions the state machine forbids
    fn advance(&mut self, next: CrawlPhase) -> crate::Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(GleanerError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}
