use crate::config::types::{Config, CrawlOptions, ScopeMode};
use crate::output::ExportFormat;
use crate::{ConfigError, ConfigResult};
use std::time::Duration;
use url::Url;

/// Longest page timeout accepted, in seconds
const MAX_PAGE_TIMEOUT_SECS: u64 = 600;

/// Validates the entire configuration
///
/// The seed URL is optional at this stage because it may still arrive from
/// the command line or an interactive prompt; [`resolve_options`] enforces it.
pub fn validate(config: &Config) -> ConfigResult<()> {
    if let Some(url) = config.crawl.url.as_deref() {
        parse_seed_url(url)?;
    }

    if let Some(page) = config.crawl.page.as_deref() {
        parse_seed_url(page)?;
    }

    if config.output.folder.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output folder cannot be empty".to_string(),
        ));
    }

    config
        .output
        .format
        .parse::<ExportFormat>()
        .map_err(|e| ConfigError::Validation(e.to_string()))?;

    let timeout = config.fetch.page_timeout_secs;
    if timeout < 1 || timeout > MAX_PAGE_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "page-timeout-secs must be between 1 and {}, got {}",
            MAX_PAGE_TIMEOUT_SECS, timeout
        )));
    }

    Ok(())
}

/// Parses an operator-supplied seed URL, prefixing `https://` when the scheme
/// is missing
///
/// # Examples
///
/// ```
/// use site_gleaner::config::parse_seed_url;
///
/// let url = parse_seed_url("example.com/docs").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
///
/// assert!(parse_seed_url("http://").is_err());
/// ```
pub fn parse_seed_url(input: &str) -> ConfigResult<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidUrl("URL cannot be empty".to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' must use http or https",
            trimmed
        )));
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", trimmed, e)))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ConfigError::InvalidUrl(format!(
            "'{}' has no host",
            trimmed
        ))),
    }
}

/// Builds the immutable crawl options from a validated configuration
///
/// In single-page scope the explicitly given page replaces the seed; when no
/// page is given the seed itself is harvested.
pub fn resolve_options(config: &Config) -> ConfigResult<CrawlOptions> {
    validate(config)?;

    let seed_input = config
        .crawl
        .url
        .as_deref()
        .ok_or_else(|| ConfigError::Validation("a seed URL is required".to_string()))?;

    let seed = match (config.crawl.scope, config.crawl.page.as_deref()) {
        (ScopeMode::SinglePage, Some(page)) => parse_seed_url(page)?,
        _ => parse_seed_url(seed_input)?,
    };

    let keyword = config
        .crawl
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string);

    Ok(CrawlOptions {
        seed,
        keyword,
        images: config.content.images,
        videos: config.content.videos,
        ocr: config.content.ocr,
        scope: config.crawl.scope,
        render_visible: config.crawl.render_visible,
        page_timeout: Duration::from_secs(config.fetch.page_timeout_secs),
    })
}
