//! Crawl summary statistics
//!
//! This module provides the end-of-crawl summary and its console rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary statistics for one crawl session
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    /// URL the crawl started from
    pub seed: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// URLs admitted to the frontier (including the seed)
    pub pages_admitted: u64,

    /// Pages whose markup was fetched and processed
    pub pages_fetched: u64,

    /// Pages skipped after a fetch error or timeout
    pub pages_failed: u64,

    /// Admitted pages never fetched because the crawl was cancelled
    pub pages_pending: u64,

    pub text_records: u64,
    pub image_records: u64,
    pub video_records: u64,

    /// Images recorded with empty text after OCR failed
    pub ocr_failures: u64,

    pub cancelled: bool,
}

impl CrawlSummary {
    /// Wall-clock crawl duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Returns the fetch success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.pages_failed;
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / attempted as f64) * 100.0
    }
}

/// Formats a crawl summary for the console
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Summary ===\n\n");
    out.push_str(&format!("Seed: {}\n", summary.seed));
    out.push_str(&format!(
        "Duration: {:.2} seconds ({:.2} minutes)\n",
        summary.duration_seconds(),
        summary.duration_seconds() / 60.0
    ));
    if summary.cancelled {
        out.push_str(&format!(
            "Status: cancelled ({} pages left unfetched)\n",
            summary.pages_pending
        ));
    } else {
        out.push_str("Status: completed\n");
    }
    out.push('\n');

    out.push_str("Pages:\n");
    out.push_str(&format!("  Admitted: {}\n", summary.pages_admitted));
    out.push_str(&format!("  Fetched: {}\n", summary.pages_fetched));
    out.push_str(&format!("  Failed: {}\n", summary.pages_failed));
    out.push('\n');

    out.push_str("Records:\n");
    out.push_str(&format!("  Text: {}\n", summary.text_records));
    out.push_str(&format!("  Images: {}\n", summary.image_records));
    out.push_str(&format!("  Videos: {}\n", summary.video_records));
    if summary.ocr_failures > 0 {
        out.push_str(&format!("  OCR failures: {}\n", summary.ocr_failures));
    }
    out.push('\n');

    out.push_str(&format!(
        "Success Rate: {:.1}% ({} / {} pages fetched)\n",
        summary.success_rate(),
        summary.pages_fetched,
        summary.pages_fetched + summary.pages_failed
    ));

    out
}

/// Prints a crawl summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", format_summary(summary));
}
