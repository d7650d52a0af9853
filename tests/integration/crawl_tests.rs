//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, extract, filter and record cycle end-to-end.

use async_trait::async_trait;
use site_gleaner::config::{CrawlOptions, ScopeMode};
use site_gleaner::crawler::{
    build_http_client, CrawlEngine, FetchedPage, HttpFetcher, PageFetcher, TextRecognizer,
};
use site_gleaner::{FetchError, OcrError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an engine that fetches over plain HTTP
fn http_engine() -> CrawlEngine {
    let client = build_http_client("TestBot/1.0").expect("Failed to build client");
    CrawlEngine::new(Arc::new(HttpFetcher::new(client)))
}

fn options_for(server: &MockServer, page: &str) -> CrawlOptions {
    let seed = Url::parse(&format!("{}{}", server.uri(), page)).expect("Failed to parse seed");
    CrawlOptions::new(seed)
}

async fn mount_page(server: &MockServer, route: &str, body: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(expected)
        .mount(server)
        .await;
}

struct FailingRecognizer;

/// Fetches over HTTP and fires the token as soon as the first page arrives
struct CancelAfterFirstPage {
    inner: HttpFetcher,
    cancel: CancellationToken,
}

#[async_trait]
impl PageFetcher for CancelAfterFirstPage {
    async fn fetch(&self, url: &Url, render_visible: bool) -> Result<FetchedPage, FetchError> {
        let page = self.inner.fetch(url, render_visible).await;
        self.cancel.cancel();
        page
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.inner.fetch_bytes(url).await
    }
}

#[async_trait]
impl TextRecognizer for FailingRecognizer {
    async fn recognize(&self, _image: &[u8]) -> Result<String, OcrError> {
        Err(OcrError::Failed("unreadable image".to_string()))
    }
}

#[tokio::test]
async fn test_cyclic_links_fetch_each_page_once() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/a",
        r#"<html><head><title>A</title></head><body>
        <p>Page A</p><a href="/b">to B</a><a href="/a">self</a>
        </body></html>"#,
        1,
    )
    .await;
    mount_page(
        &server,
        "/b",
        r#"<html><body><p>Page B</p><a href="/a">back to A</a><a href="/b#top">top</a></body></html>"#,
        1,
    )
    .await;

    let mut engine = http_engine();
    let outcome = engine
        .crawl(options_for(&server, "/a"))
        .await
        .expect("Crawl failed");

    let urls: Vec<&str> = outcome.results.text.iter().map(|t| t.url.as_str()).collect();
    assert_eq!(urls.len(), 2);
    assert!(urls[0].ends_with("/a"));
    assert!(urls[1].ends_with("/b"));
    assert_eq!(outcome.results.text[0].title, "A");
    assert_eq!(outcome.summary.pages_fetched, 2);
    assert!(!outcome.summary.cancelled);
}

#[tokio::test]
async fn test_other_origin_never_fetched() {
    let site = MockServer::start().await;
    let elsewhere = MockServer::start().await;

    mount_page(
        &site,
        "/",
        &format!(
            r#"<html><body><a href="{}/outside">out</a><a href="/inside">in</a></body></html>"#,
            elsewhere.uri()
        ),
        1,
    )
    .await;
    mount_page(&site, "/inside", "<p>inside</p>", 1).await;
    mount_page(&elsewhere, "/outside", "<p>outside</p>", 0).await;

    let outcome = http_engine()
        .crawl(options_for(&site, "/"))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.summary.pages_admitted, 2);
    assert!(outcome
        .results
        .text
        .iter()
        .all(|t| !t.url.contains("/outside")));
}

#[tokio::test]
async fn test_keyword_filter_on_live_pages() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body><p>hello world</p><a href="/bye">bye</a></body></html>"#,
        2,
    )
    .await;
    mount_page(&server, "/bye", "<html><body><p>goodbye</p></body></html>", 2).await;

    let mut options = options_for(&server, "/");
    options.keyword = Some("HELLO".to_string());
    let filtered = http_engine().crawl(options).await.expect("Crawl failed");

    assert_eq!(filtered.results.text.len(), 1);
    assert!(filtered.results.text[0].content.contains("hello world"));

    let unfiltered = http_engine()
        .crawl(options_for(&server, "/"))
        .await
        .expect("Crawl failed");
    assert_eq!(unfiltered.results.text.len(), 2);
}

#[tokio::test]
async fn test_missing_page_skipped() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/gone">gone</a><a href="/here">here</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/here", "<p>still here</p>", 1).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = http_engine()
        .crawl(options_for(&server, "/"))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.summary.pages_failed, 1);
    assert_eq!(outcome.summary.pages_fetched, 2);
    assert!(outcome
        .results
        .text
        .iter()
        .any(|t| t.content.contains("still here")));
}

#[tokio::test]
async fn test_single_page_scope() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/about",
        r#"<p>About us</p><a href="/contact">contact</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/contact", "<p>contact</p>", 0).await;

    let mut options = options_for(&server, "/about");
    options.scope = ScopeMode::SinglePage;
    let outcome = http_engine().crawl(options).await.expect("Crawl failed");

    assert_eq!(outcome.results.text.len(), 1);
    assert_eq!(outcome.summary.pages_admitted, 1);
}

#[tokio::test]
async fn test_ocr_failure_degrades_to_empty_text() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<p>gallery</p><img src="/photo.png"><img src="/missing.png">"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/photo.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x89, b'P', b'N', b'G'])
                .insert_header("content-type", "image/png"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut options = options_for(&server, "/");
    options.images = true;
    options.ocr = true;

    let outcome = http_engine()
        .with_recognizer(Arc::new(FailingRecognizer))
        .crawl(options)
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.results.images.len(), 2);
    assert!(outcome
        .results
        .images
        .iter()
        .all(|i| i.extracted_text.as_deref() == Some("")));
    assert_eq!(outcome.summary.ocr_failures, 2);
    assert_eq!(outcome.results.text.len(), 1);
}

#[tokio::test]
async fn test_cancelled_crawl_keeps_nothing_unfetched() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>never fetched</p>", 0).await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = http_engine()
        .with_cancellation(cancel)
        .crawl(options_for(&server, "/"))
        .await
        .expect("Crawl failed");

    assert!(outcome.results.is_empty());
    assert!(outcome.summary.cancelled);
}

#[tokio::test]
async fn test_cancel_after_first_page_keeps_its_record() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<p>first page</p><a href="/second">2</a><a href="/third">3</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/second", "<p>second page</p>", 0).await;
    mount_page(&server, "/third", "<p>third page</p>", 0).await;

    let cancel = CancellationToken::new();
    let client = build_http_client("TestBot/1.0").expect("Failed to build client");
    let fetcher = CancelAfterFirstPage {
        inner: HttpFetcher::new(client),
        cancel: cancel.clone(),
    };

    let outcome = CrawlEngine::new(Arc::new(fetcher))
        .with_cancellation(cancel)
        .crawl(options_for(&server, "/"))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.results.text.len(), 1);
    assert!(outcome.results.text[0].content.contains("first page"));
    assert!(outcome.summary.cancelled);
    assert!(outcome.summary.pages_pending > 0);
    assert_eq!(outcome.summary.pages_fetched, 1);
}

#[tokio::test]
async fn test_relative_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/docs">docs</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/docs/", r#"<p>Docs index</p><a href="intro">intro</a>"#, 1).await;
    mount_page(&server, "/docs/intro", "<p>Introduction</p>", 1).await;

    let outcome = http_engine()
        .crawl(options_for(&server, "/"))
        .await
        .expect("Crawl failed");

    let urls: Vec<&str> = outcome.results.text.iter().map(|t| t.url.as_str()).collect();
    assert_eq!(urls.len(), 3);
    assert!(urls[1].ends_with("/docs/"));
    assert!(urls[2].ends_with("/docs/intro"));
    assert!(outcome.results.text[2].content.contains("Introduction"));
    assert_eq!(outcome.summary.pages_failed, 0);
}

#[tokio::test]
async fn test_redirect_off_origin_not_recorded() {
    let server = MockServer::start().await;
    let elsewhere = MockServer::start().await;

    mount_page(&server, "/", r#"<p>home</p><a href="/go">go</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/go"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/landing", elsewhere.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>FOREIGN ORIGIN CONTENT</p>"))
        .mount(&elsewhere)
        .await;

    let outcome = http_engine()
        .crawl(options_for(&server, "/"))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.results.text.len(), 1);
    assert!(outcome
        .results
        .text
        .iter()
        .all(|t| !t.url.ends_with("/go") && !t.content.contains("FOREIGN")));
    assert_eq!(outcome.summary.pages_failed, 1);
}

#[tokio::test]
async fn test_links_fetched_with_query_as_written() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/list?page&b=1&a=2&a=1">list</a><a href="/raw?q=%FF">raw</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/list", "<p>list</p>", 1).await;
    mount_page(&server, "/raw", "<p>raw</p>", 1).await;

    http_engine()
        .crawl(options_for(&server, "/"))
        .await
        .expect("Crawl failed");

    let requests = server
        .received_requests()
        .await
        .expect("Request recording disabled");
    let queries: Vec<Option<String>> = requests
        .iter()
        .filter(|r| r.url.path() != "/")
        .map(|r| r.url.query().map(str::to_string))
        .collect();

    assert_eq!(
        queries,
        vec![
            Some("page&b=1&a=2&a=1".to_string()),
            Some("q=%FF".to_string())
        ]
    );
}
