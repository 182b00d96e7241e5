// src/error.rs
// =============================================================================
// Error types shared by the crawl engine and the keyword analyzer.
//
// Taxonomy:
// - TransportError: DNS / connect / timeout failures talking to a server.
//   Recovered locally: the URL is classified broken and the crawl goes on.
// - CrawlError: problems that stop a crawl before it starts (bad input).
// - KeywordError: why a single URL could not be analyzed.
// - InterestError: failures from the optional interest lookup. Only the
//   enrichment wrapper ever sees these; they never reach the caller.
//
// Rust concepts:
// - thiserror: derive macro that writes the Display and Error impls for us
// - #[from]: lets `?` convert one error type into another automatically
// =============================================================================

use std::time::Duration;
use thiserror::Error;

/// A request never produced an HTTP response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The server did not answer in time
    #[error("request timed out")]
    Timeout,
    /// The hostname could not be resolved
    #[error("could not resolve hostname")]
    Dns,
    /// TLS handshake or certificate problem
    #[error("TLS certificate error")]
    Tls,
    /// Redirect loop or redirect limit exceeded
    #[error("too many redirects")]
    TooManyRedirects,
    /// TCP connection refused or reset
    #[error("connection failed")]
    Connect,
    /// Anything else reqwest can report
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        // Convert error to string once so we can look for hints in the message
        let message = error.to_string().to_lowercase();

        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_redirect() {
            TransportError::TooManyRedirects
        } else if error.is_connect() {
            if message.contains("dns") || message.contains("resolve") {
                TransportError::Dns
            } else {
                TransportError::Connect
            }
        } else if message.contains("certificate") || message.contains("ssl") || message.contains("tls") {
            TransportError::Tls
        } else {
            TransportError::Other(error.to_string())
        }
    }
}

/// Errors that prevent a crawl from starting.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Missing or empty start URL, zero page cap, zero concurrency
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The start URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Reasons a single URL produced no keyword report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeywordError {
    /// Missing URL or empty URL list
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The page could not be fetched
    #[error("fetch failed: {0}")]
    Transport(#[from] TransportError),

    /// The page answered with a client or server error
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// No content words survived filtering
    #[error("no content words found")]
    NoContent,
}

/// Failures from the interest lookup service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InterestError {
    /// The service asked us to slow down
    #[error("rate limited")]
    RateLimited {
        /// Server-suggested wait, from the Retry-After header
        retry_after: Option<Duration>,
    },

    /// Any other failure (network, bad payload, 5xx)
    #[error("interest lookup unavailable: {0}")]
    Unavailable(String),
}

impl InterestError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, InterestError::RateLimited { .. })
    }
}
