// src/page/types.rs
// =============================================================================
// Data passed between the HTML boundary, the link extractor, the page
// processor and the crawl scheduler.
//
// Rust concepts:
// - #[derive(Serialize)]: these types end up in the JSON report
// - #[serde(untagged)]: LinkFailure serializes as a bare number or string
// =============================================================================

use serde::Serialize;
use std::fmt;

/// Anchor text used when an <a> element has no visible text
pub const NO_TEXT: &str = "[no text]";

/// Source recorded for the seed, which no page links to
pub const UNKNOWN_SOURCE: &str = "unknown";

/// One <a href> element as it appears in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    /// Visible text, whitespace collapsed; may be empty
    pub text: String,
}

impl Anchor {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

/// A discovered link: where it points, what it said, where we saw it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LinkRecord {
    /// Canonical target URL
    pub url: String,
    pub anchor_text: String,
    /// Canonical URL of the page the link was found on
    pub source: String,
}

impl LinkRecord {
    pub fn new(url: impl Into<String>, anchor_text: &str, source: impl Into<String>) -> Self {
        let anchor_text = anchor_text.trim();
        Self {
            url: url.into(),
            anchor_text: if anchor_text.is_empty() {
                NO_TEXT.to_string()
            } else {
                anchor_text.to_string()
            },
            source: source.into(),
        }
    }

    // The synthetic record for the crawl's start URL
    pub fn seed(url: impl Into<String>) -> Self {
        Self::new(url, "", UNKNOWN_SOURCE)
    }
}

/// Why a link counts as broken
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LinkFailure {
    /// The server answered with a status of 400 or more
    Status(u16),
    /// No HTTP response at all
    Transport(String),
}

impl fmt::Display for LinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkFailure::Status(code) => write!(f, "HTTP {}", code),
            LinkFailure::Transport(message) => write!(f, "{}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    #[serde(flatten)]
    pub link: LinkRecord,
    pub status: LinkFailure,
}

impl BrokenLink {
    pub fn new(link: LinkRecord, status: LinkFailure) -> Self {
        Self { link, status }
    }

    pub fn url(&self) -> &str {
        &self.link.url
    }
}

/// How the page itself fared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// Fetched and (if HTML) parsed
    Ok(u16),
    /// Probe or fetch answered with a status of 400 or more
    Broken(u16),
    /// Transport failure, the "error" status
    Error(String),
}

impl PageStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, PageStatus::Ok(_))
    }

    // The broken-link classification for a failed page, if it failed
    pub fn failure(&self) -> Option<LinkFailure> {
        match self {
            PageStatus::Ok(_) => None,
            PageStatus::Broken(code) => Some(LinkFailure::Status(*code)),
            PageStatus::Error(message) => Some(LinkFailure::Transport(message.clone())),
        }
    }
}

/// Everything one worker learned about one page
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Canonical URL that was requested
    pub url: String,
    /// Canonical URL the fetch ended at, when redirects changed it
    pub final_url: Option<String>,
    pub status: PageStatus,
    pub internal: Vec<LinkRecord>,
    pub external: Vec<LinkRecord>,
    /// Links on this page that failed their sub-probe
    pub broken: Vec<BrokenLink>,
}

impl PageResult {
    // A page that yielded nothing: every link set is empty
    pub fn failed(url: impl Into<String>, status: PageStatus) -> Self {
        Self {
            url: url.into(),
            final_url: None,
            status,
            internal: Vec::new(),
            external: Vec::new(),
            broken: Vec::new(),
        }
    }
}
