//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: The per-page state machine the engine steps through
//! - `ProgressEstimator`: Sliding window of page durations used for the ETA

mod phase;
mod progress;

// Re-export main types
pub use phase::CrawlPhase;
pub use progress::{ProgressEstimator, WINDOW_CAPACITY};
