// src/page/links.rs
// =============================================================================
// This module classifies a page's anchors into internal and external links.
//
// How it works:
// 1. Resolve each href against the page URL (relative -> absolute)
// 2. Drop anything that is not http(s) (mailto:, tel:, javascript:, ...)
// 3. Drop same-page anchors (anything carrying a #fragment)
// 4. Internal iff the resolved host equals the crawl's origin host
// 5. Canonicalize, and keep only the first anchor seen for each URL
//
// This is a pure transformation: no network access, no shared state.
// =============================================================================

use super::types::{Anchor, LinkRecord};
use crate::canonical::{normalize, origin_host};
use std::collections::HashSet;
use url::Url;

/// Links found on one page, split by origin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    pub internal: Vec<LinkRecord>,
    pub external: Vec<LinkRecord>,
}

impl ExtractedLinks {
    pub fn len(&self) -> usize {
        self.internal.len() + self.external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Classifies anchors found on `page_url`.
//
// Parameters:
//   anchors: hrefs and texts in document order
//   page_url: absolute URL the anchors were found on (after redirects)
//   origin: host[:port] of the crawl's start URL
//
// Returns: ExtractedLinks, each list deduplicated by canonical URL
pub fn extract_links(anchors: &[Anchor], page_url: &str, origin: &str) -> ExtractedLinks {
    let mut links = ExtractedLinks::default();

    // Parse the page URL once; we resolve every href against it
    let Ok(base) = Url::parse(page_url) else {
        return links;
    };
    let source = normalize(page_url);

    let mut seen = HashSet::new();
    for anchor in anchors {
        let Some(resolved) = resolve_link(&base, &anchor.href) else {
            continue;
        };

        let canonical = normalize(resolved.as_str());
        if !seen.insert(canonical.clone()) {
            continue;
        }

        let record = LinkRecord::new(canonical, &anchor.text, source.as_str());
        if origin_host(&resolved).as_deref() == Some(origin) {
            links.internal.push(record);
        } else {
            links.external.push(record);
        }
    }

    links
}

// Resolves a link (possibly relative) to an absolute http(s) URL.
//
// Returns None for:
// - hrefs that cannot be resolved
// - non-web schemes (mailto:, tel:, javascript:, data:, ...)
// - anything with a fragment, i.e. same-page anchors like "#section"
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let resolved = base.join(href).ok()?;

    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    if resolved.fragment().is_some_and(|fragment| !fragment.is_empty()) || href.contains('#') {
        return None;
    }

    Some(resolved)
}
