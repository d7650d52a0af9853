use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Main configuration structure for Site-Gleaner
///
/// Every table and key is optional; command-line flags are layered on top of
/// whatever the file provides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub content: ContentConfig,
    pub output: OutputConfig,
    pub fetch: FetchConfig,
}

/// What to crawl and how far
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Seed URL; `https://` is prefixed when no scheme is given
    pub url: Option<String>,

    /// Only record page text containing this keyword (case-insensitive)
    pub keyword: Option<String>,

    /// Single page or whole site
    pub scope: ScopeMode,

    /// Page to harvest in single-page scope (defaults to the seed)
    pub page: Option<String>,

    /// Show the browser window while rendering
    #[serde(rename = "render-visible")]
    pub render_visible: bool,
}

/// Which content categories to collect besides page text
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub images: bool,
    pub videos: bool,
    /// Run OCR over every collected image
    pub ocr: bool,
}

/// Where and how results are written
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output folder, created if absent
    pub folder: String,

    /// One of json, txt, docx, csv, pdf, xlsx
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            folder: "results".to_string(),
            format: "json".to_string(),
        }
    }
}

/// Page fetching and OCR collaborators
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub renderer: Renderer,

    /// Upper bound on a single page fetch, in seconds
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Chromium-compatible binary used by the browser renderer
    #[serde(rename = "browser-binary")]
    pub browser_binary: String,

    /// Tesseract binary used for OCR
    #[serde(rename = "ocr-binary")]
    pub ocr_binary: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            renderer: Renderer::Http,
            page_timeout_secs: 30,
            user_agent: format!("SiteGleaner/{}", env!("CARGO_PKG_VERSION")),
            browser_binary: "chromium".to_string(),
            ocr_binary: "tesseract".to_string(),
        }
    }
}

/// Crawl scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeMode {
    /// Harvest exactly one page and follow no links
    SinglePage,
    /// Follow every same-origin link until the frontier is exhausted
    #[default]
    WholeSite,
}

/// Page rendering backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Renderer {
    /// Plain HTTP GET of the page markup
    #[default]
    Http,
    /// Headless Chromium `--dump-dom`
    Browser,
}

/// Immutable configuration snapshot captured once at crawl start
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// First page to fetch; its origin bounds the crawl
    pub seed: Url,
    pub keyword: Option<String>,
    pub images: bool,
    pub videos: bool,
    pub ocr: bool,
    pub scope: ScopeMode,
    pub render_visible: bool,
    pub page_timeout: Duration,
}

impl CrawlOptions {
    /// Whole-site text-only crawl from `seed` with a 30 second page timeout
    pub fn new(seed: Url) -> Self {
        Self {
            seed,
            keyword: None,
            images: false,
            videos: false,
            ocr: false,
            scope: ScopeMode::WholeSite,
            render_visible: false,
            page_timeout: Duration::from_secs(30),
        }
    }

    /// Returns true if discovered links should be followed
    pub fn follows_links(&self) -> bool {
        self.scope == ScopeMode::WholeSite
    }
}
