use url::Url;

/// Returns true if both URLs share scheme, host and port
///
/// Default ports compare equal to an explicit default port, so
/// `https://example.com/` and `https://example.com:443/` are same-origin.
///
/// # Examples
///
/// ```
/// use site_gleaner::url::same_origin;
/// use url::Url;
///
/// let seed = Url::parse("https://example.com/").unwrap();
/// assert!(same_origin(&seed, &Url::parse("https://example.com:443/a").unwrap()));
/// assert!(!same_origin(&seed, &Url::parse("http://example.com/a").unwrap()));
/// assert!(!same_origin(&seed, &Url::parse("https://blog.example.com/").unwrap()));
/// ```
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

/// Serializes the origin of a URL for logs, e.g. `https://example.com:8080`
pub fn origin_label(url: &Url) -> String {
    url.origin().ascii_serialization()
}
