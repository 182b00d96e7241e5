// src/canonical.rs
// =============================================================================
// URL canonicalization used for dedup and equality.
//
// Two URLs are "the same page" for the crawler iff their canonical strings
// are byte-identical. Canonical form:
// - the #fragment is removed
// - trailing slashes are removed, unless nothing but the slash is left
//
// Same-origin checks compare the host (and explicit port) exactly. There is
// no www-stripping: www.example.com and example.com are different origins.
//
// Rust concepts:
// - &str vs String: normalize() borrows its input and returns a new String
// - Option: origin_host() returns None for URLs without a host (mailto:, data:)
// =============================================================================

use url::Url;

// Canonicalizes a URL string.
//
// Pure and idempotent: normalize(&normalize(x)) == normalize(x).
//
// Examples:
//   "https://example.com/"          -> "https://example.com"
//   "https://example.com/docs/"     -> "https://example.com/docs"
//   "https://example.com/a#intro"   -> "https://example.com/a"
//   "/"                             -> "/"
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();

    // Fragment-only differences never make two pages distinct
    let without_fragment = match trimmed.find('#') {
        Some(index) => &trimmed[..index],
        None => trimmed,
    };

    let stripped = without_fragment.trim_end_matches('/');
    if stripped.is_empty() || stripped.ends_with(':') {
        // "/" or "https://" would collapse into something that is not a URL
        return without_fragment.to_string();
    }

    stripped.to_string()
}

// Returns the origin identity of a URL: host plus explicit port.
//
// "https://example.com/a"      -> Some("example.com")
// "http://localhost:8080/a"    -> Some("localhost:8080")
// "mailto:someone@example.com" -> None
pub fn origin_host(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

// Identity of a crawlable page: the canonical URL without its http(s)
// scheme. Same-origin checks ignore the scheme, so http://host/a and
// https://host/a are one page to the crawler.
//
// "https://example.com/a" -> "example.com/a"
pub fn page_key(canonical: &str) -> &str {
    canonical
        .strip_prefix("https://")
        .or_else(|| canonical.strip_prefix("http://"))
        .unwrap_or(canonical)
}

// Parses an absolute URL and returns both the parsed form and its canonical
// string. Used for the crawl's start URL.
pub fn parse_absolute(raw: &str) -> Result<(Url, String), url::ParseError> {
    let url = Url::parse(raw.trim())?;
    let canonical = normalize(url.as_str());
    Ok((url, canonical))
}
