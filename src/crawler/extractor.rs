//! HTML content extraction
//!
//! This module turns page markup into the pieces the crawler records:
//! - Site title and description
//! - Full visible text
//! - Image and video references (absolute URLs)
//! - Links to follow

use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text is never part of the page text
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Everything extracted from one page
///
/// Absent fields are empty; extraction never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// The page title (from the `<title>` tag)
    pub title: String,

    /// `meta[name=description]`, falling back to `og:description`
    pub description: String,

    /// Visible text, one line per text node
    pub text: String,

    /// Absolute `img[src]` URLs
    pub images: Vec<Url>,

    /// Absolute `video[src]` and `video source[src]` URLs
    pub videos: Vec<Url>,

    /// Absolute `a[href]` URLs
    pub links: Vec<Url>,
}

/// Parses HTML content and extracts metadata, text, media and links
///
/// # Link Extraction Rules
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
/// - `<a href="..." download>`
///
/// # Example
///
/// ```
/// use site_gleaner::crawler::extract_content;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head>
///     <body><p>Hi</p><img src="/a.png"><a href="/page">Link</a></body></html>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let page = extract_content(html, &base);
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.images[0].as_str(), "https://example.com/a.png");
/// assert_eq!(page.links[0].as_str(), "https://example.com/page");
/// ```
pub fn extract_content(html: &str, base_url: &Url) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        title: extract_title(&document),
        description: extract_description(&document),
        text: extract_text(&document),
        images: extract_sources(&document, &["img[src]"], "src", base_url),
        videos: extract_sources(
            &document,
            &["video[src]", "video source[src]"],
            "src",
            base_url,
        ),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Extracts the meta description, preferring the standard tag over OpenGraph
fn extract_description(document: &Html) -> String {
    for query in [
        "meta[name='description'][content]",
        "meta[property='og:description'][content]",
    ] {
        let Ok(selector) = Selector::parse(query) else {
            continue;
        };

        if let Some(content) = document
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr("content"))
        {
            return content.trim().to_string();
        }
    }

    String::new()
}

/// Collects visible text nodes, whitespace-collapsed, one per line
fn extract_text(document: &Html) -> String {
    let mut lines = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ElementRef::wrap(ancestor)
                .map_or(false, |element| HIDDEN_TEXT_ELEMENTS.contains(&element.value().name()))
        });
        if hidden {
            continue;
        }

        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            lines.push(collapsed);
        }
    }

    lines.join("\n")
}

/// Resolves the `attr` of every element matching any of `queries`
fn extract_sources(document: &Html, queries: &[&str], attr: &str, base_url: &Url) -> Vec<Url> {
    let mut sources = Vec::new();

    for query in queries {
        let Ok(selector) = Selector::parse(query) else {
            continue;
        };

        for element in document.select(&selector) {
            if let Some(resolved) = element
                .value()
                .attr(attr)
                .and_then(|value| resolve_link(value, base_url))
            {
                sources.push(resolved);
            }
        }
    }

    sources
}

/// Extracts all followable links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}
