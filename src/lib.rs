//! Site-Gleaner: a same-origin website content harvester
//!
//! This crate walks a website from a seed URL, extracts text, image and video
//! references from every reachable page, and exports the aggregated result as
//! JSON, plain text, CSV, XLSX, DOCX or PDF.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Gleaner operations
#[derive(Debug, Error)]
pub enum GleanerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors raised while fetching a single page or image
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Timed out after {seconds}s fetching {url}")]
    Timeout { url: String, seconds: u64 },

    #[error("{url} redirected off-origin to {location}")]
    CrossOriginRedirect { url: String, location: String },

    #[error("Renderer failed for {url}: {message}")]
    Render { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the OCR collaborator; never fatal to a crawl
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Failed to run OCR engine: {0}")]
    Io(#[from] std::io::Error),

    #[error("OCR engine failed: {0}")]
    Failed(String),

    #[error("OCR engine timed out after {0}s")]
    Timeout(u64),

    #[error("Image has no content")]
    EmptyImage,

    #[error("Failed to download image: {0}")]
    Download(#[from] FetchError),
}

/// Errors raised while writing a result set to disk
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("DOCX error: {0}")]
    Docx(String),

    #[error("PDF error: {0}")]
    Pdf(String),
}

/// Result type alias for Site-Gleaner operations
pub type Result<T> = std::result::Result<T, GleanerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for export operations
pub type ExportResult<T> = std::result::Result<T, ExportError>;

// Re-export commonly used types
pub use config::{Config, CrawlOptions, ScopeMode};
pub use crawler::{CrawlEngine, CrawlOutcome, CrawlSession};
pub use output::{export_results, ExportFormat};
pub use state::{CrawlPhase, ProgressEstimator};
pub use storage::{ImageEntry, PageRecord, ResultAggregator, ResultSet, TextRecord};
