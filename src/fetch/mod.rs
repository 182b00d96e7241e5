// src/fetch/mod.rs
// =============================================================================
// The boundary between the crawl engine and the network.
//
// The engine only needs two capabilities:
// - fetch(url): full GET, returns status + body (+ where redirects ended up)
// - probe(url): cheap liveness check, returns just the status
//
// Both are expressed as the `Fetcher` trait so the scheduler and the page
// processor can be driven by the real reqwest client in production and by an
// in-memory fixture site in tests.
//
// Submodules:
// - http: the reqwest-backed implementation
// - stub: a deterministic in-memory site (tests only)
// =============================================================================

mod http;
#[cfg(test)]
pub mod stub;

use crate::error::TransportError;
use async_trait::async_trait;

pub use http::HttpFetcher;

/// The outcome of a full GET that produced an HTTP response
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code of the final response
    pub status: u16,
    /// URL after following redirects
    pub final_url: String,
    /// Content-Type header, when the server sent one
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchedPage {
    // Returns true when the body should be parsed for anchors.
    // A missing Content-Type is given the benefit of the doubt.
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            Some(content_type) => {
                let content_type = content_type.to_ascii_lowercase();
                content_type.contains("text/html") || content_type.contains("application/xhtml")
            }
            None => true,
        }
    }
}

// Anything that can retrieve pages for the crawler.
//
// Implementations must be shareable across worker tasks (Send + Sync) because
// the scheduler hands one Arc<F> to every worker in a batch.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Full GET of `url`
    async fn fetch(&self, url: &str) -> Result<FetchedPage, TransportError>;

    /// Status-only liveness check of `url`
    async fn probe(&self, url: &str) -> Result<u16, TransportError>;
}

// Status codes of 400 and above mean the target is broken
pub fn is_broken_status(status: u16) -> bool {
    status >= 400
}
