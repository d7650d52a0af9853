//! Page fetcher implementations
//!
//! This module provides the two ways the crawler obtains page markup:
//! - `HttpFetcher`: plain GET of the page over reqwest
//! - `BrowserFetcher`: a Chromium-compatible binary rendering the page and
//!   dumping the resulting DOM
//!
//! Both download raw image bytes over HTTP for OCR.

use crate::config::{FetchConfig, Renderer};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Response};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use url::Url;

/// Maximum number of redirects followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Markup of a fetched page and the URL it was finally served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL after redirects; relative links resolve against this
    pub url: Url,
    pub markup: String,
}

/// Source of rendered page markup
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the markup of the page at `url` and where it ended up
    ///
    /// `render_visible` asks renderers that support it to show their window.
    async fn fetch(&self, url: &Url, render_visible: bool) -> Result<FetchedPage, FetchError>;

    /// Returns the raw bytes at `url` (used to download images)
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header sent with every request
///
/// # Example
///
/// ```no_run
/// use site_gleaner::crawler::build_http_client;
///
/// let client = build_http_client("SiteGleaner/1.0").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the fetcher selected by the configuration
pub fn build_fetcher(config: &FetchConfig) -> Result<Arc<dyn PageFetcher>, reqwest::Error> {
    let client = build_http_client(&config.user_agent)?;

    Ok(match config.renderer {
        Renderer::Http => Arc::new(HttpFetcher::new(client)),
        Renderer::Browser => Arc::new(BrowserFetcher::new(&config.browser_binary, client)),
    })
}

/// Sends a GET request and rejects non-success statuses
async fn get_checked(client: &Client, url: &Url) -> Result<Response, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

/// Fetches page markup with a plain HTTP GET
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, render_visible: bool) -> Result<FetchedPage, FetchError> {
        if render_visible {
            tracing::debug!("HTTP fetcher has no window to show for {}", url);
        }

        let response = get_checked(&self.client, url).await?;
        let final_url = response.url().clone();
        if final_url != *url {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        let markup = response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedPage {
            url: final_url,
            markup,
        })
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = get_checked(&self.client, url).await?;
        let bytes = response.bytes().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

/// Renders pages with a Chromium-compatible browser binary
///
/// The browser is started once per page with `--dump-dom`, which prints the
/// serialized DOM after scripts have run. The child is killed if the future
/// is dropped, so the engine's page timeout also bounds the browser.
///
/// `--dump-dom` does not report where navigation ended, so the page is taken
/// to live at the requested URL; a `<base href>` in the DOM still applies.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    binary: String,
    client: Client,
}

impl BrowserFetcher {
    pub fn new(binary: &str, client: Client) -> Self {
        Self {
            binary: binary.to_string(),
            client,
        }
    }

    /// Command-line arguments for rendering `url`
    fn render_args(url: &Url, render_visible: bool) -> Vec<String> {
        let mut args = Vec::with_capacity(4);
        if !render_visible {
            args.push("--headless=new".to_string());
        }
        args.push("--disable-gpu".to_string());
        args.push("--dump-dom".to_string());
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &Url, render_visible: bool) -> Result<FetchedPage, FetchError> {
        let output = Command::new(&self.binary)
            .args(Self::render_args(url, render_visible))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(FetchError::Render {
                url: url.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(FetchedPage {
            url: url.clone(),
            markup: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = get_checked(&self.client, url).await?;
        let bytes = response.bytes().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(build_http_client("TestGleaner/1.0").unwrap())
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client("TestGleaner/1.0").is_ok());
    }

    #[test]
    fn test_build_fetcher_for_each_renderer() {
        let mut config = FetchConfig::default();
        assert!(build_fetcher(&config).is_ok());

        config.renderer = Renderer::Browser;
        assert!(build_fetcher(&config).is_ok());
    }

    #[test]
    fn test_browser_args_headless_by_default() {
        let url = Url::parse("https://example.com/").unwrap();

        let args = BrowserFetcher::render_args(&url, false);
        assert_eq!(args[0], "--headless=new");
        assert_eq!(args.last().map(String::as_str), Some("https://example.com/"));

        let args = BrowserFetcher::render_args(&url, true);
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
        assert!(args.contains(&"--dump-dom".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/", server.uri())).unwrap();
        let page = fetcher().fetch(&url, false).await.unwrap();
        assert_eq!(page.markup, "<html>ok</html>");
        assert_eq!(page.url, url);
    }

    #[tokio::test]
    async fn test_fetch_reports_final_url_after_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/docs/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>docs</p>"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/docs", server.uri())).unwrap();
        let page = fetcher().fetch(&url, false).await.unwrap();

        assert_eq!(page.url.path(), "/docs/");
        assert_eq!(page.markup, "<p>docs</p>");
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let result = fetcher().fetch(&url, false).await;
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_fetch_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/img.png", server.uri())).unwrap();
        let bytes = fetcher().fetch_bytes(&url).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_browser_missing_binary_is_io_error() {
        let client = build_http_client("TestGleaner/1.0").unwrap();
        let browser = BrowserFetcher::new("/nonexistent/chromium-binary", client);
        let url = Url::parse("https://example.com/").unwrap();

        let result = browser.fetch(&url, false).await;
        assert!(matches!(result, Err(FetchError::Io(_))));
    }
}
