use url::Url;

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
];

/// Normalizes a URL into the form the crawler fetches
///
/// # Normalization Steps
///
/// 1. Reject anything that is not HTTP(S) or has no host
/// 2. Remove fragment (everything after #)
/// 3. Remove tracking query parameters
/// 4. Remove empty query string (trailing ?)
///
/// The remaining query is kept byte for byte, in its original order: no
/// decoding, re-encoding or sorting, so the request matches the link. Host
/// lowercasing, dot-segment removal and default-port elision are already
/// performed by the `url` parser.
///
/// # Returns
///
/// * `Some(Url)` - Normalized URL
/// * `None` - The URL can never be admitted to a crawl
///
/// # Examples
///
/// ```
/// use site_gleaner::url::normalize_url;
/// use url::Url;
///
/// let url = Url::parse("HTTP://Example.COM:80/a/../b?z=1&utm_source=x&a=2#top").unwrap();
/// let normalized = normalize_url(&url).unwrap();
/// assert_eq!(normalized.as_str(), "http://example.com/b?z=1&a=2");
/// ```
pub fn normalize_url(url: &Url) -> Option<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return None,
    }

    let mut url = url.clone();
    url.set_fragment(None);

    if let Some(query) = url.query().map(str::to_string) {
        let kept: Vec<&str> = query
            .split('&')
            .filter(|pair| !is_tracking_param(param_key(pair)))
            .collect();
        let kept = kept.join("&");

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&kept));
        }
    }

    Some(url)
}

/// Visited-set key for an already normalized URL
///
/// Query pairs are ordered by key so `?a=1&b=2` and `?b=2&a=1` share a key.
/// The sort is stable, so repeated keys keep their relative order and
/// `?a=2&a=1` stays distinct from `?a=1&a=2`.
///
/// # Examples
///
/// ```
/// use site_gleaner::url::visit_key;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/p?b=1&a=2&a=1").unwrap();
/// assert_eq!(visit_key(&url), "https://example.com/p?a=2&a=1&b=1");
/// ```
pub fn visit_key(url: &Url) -> String {
    let Some(query) = url.query() else {
        return url.to_string();
    };

    let mut pairs: Vec<&str> = query.split('&').collect();
    pairs.sort_by(|a, b| param_key(a).cmp(param_key(b)));

    let mut key = url.clone();
    key.set_query(Some(&pairs.join("&")));
    key.to_string()
}

/// Resolves an href found on `base` to an absolute HTTP(S) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links (same page anchors)
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute = base.join(href).ok()?;
    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute)
    } else {
        None
    }
}

/// Raw (still percent-encoded) key of one `key=value` query pair
fn param_key(pair: &str) -> &str {
    pair.split('=').next().unwrap_or(pair)
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
