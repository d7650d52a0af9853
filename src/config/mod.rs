//! Configuration module for Site-Gleaner
//!
//! This module handles loading and validating the optional TOML configuration
//! file, correcting the seed URL, and producing the immutable [`CrawlOptions`]
//! snapshot the crawl engine runs with.
//!
//! # Example
//!
//! ```no_run
//! use site_gleaner::config::{load_config, resolve_options};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gleaner.toml")).unwrap();
//! let options = resolve_options(&config).unwrap();
//! println!("Crawling from {}", options.seed);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ContentConfig, CrawlConfig, CrawlOptions, FetchConfig, OutputConfig, Renderer,
    ScopeMode,
};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{parse_seed_url, resolve_options, validate};
