// src/page/processor.rs
// =============================================================================
// The work one crawl worker does for one URL.
//
// Steps:
// 1. Liveness probe (HEAD). Failure or status >= 400 -> the page is broken,
//    stop here without downloading the body.
// 2. Full fetch (GET). Transport failure -> status "error", no links.
// 3. Extract anchors and classify them (internal / external).
// 4. Optionally sub-probe every extracted link, at most N at a time, and
//    move the ones that fail into the page's broken list.
//
// A worker is a pure function of (url, origin) -> PageResult: it never
// touches the crawl session. The scheduler merges the result afterwards.
// =============================================================================

use super::html::extract_anchors;
use super::links::{extract_links, ExtractedLinks};
use super::types::{BrokenLink, LinkFailure, LinkRecord, PageResult, PageStatus};
use crate::canonical::normalize;
use crate::fetch::{is_broken_status, Fetcher};
use futures::stream::{self, StreamExt};
use tracing::{debug, instrument, warn};

/// Knobs the page processor needs from the crawl configuration
#[derive(Debug, Clone, Copy)]
pub struct ProcessOptions {
    /// Probe every link found on the page
    pub subprobe: bool,
    /// Concurrent sub-probes per page
    pub subprobe_concurrency: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            subprobe: true,
            subprobe_concurrency: 10,
        }
    }
}

// Probes, fetches and extracts one page.
//
// Parameters:
//   fetcher: network access (shared by every worker)
//   url: canonical URL to process
//   origin: host[:port] that counts as internal
//   options: sub-probe settings
//
// Never fails: every problem is folded into the returned PageResult.
#[instrument(skip(fetcher, options))]
pub async fn process_page<F>(fetcher: &F, url: &str, origin: &str, options: ProcessOptions) -> PageResult
where
    F: Fetcher + ?Sized,
{
    // Cheap liveness check before paying for the body
    match fetcher.probe(url).await {
        Ok(status) if is_broken_status(status) => {
            debug!(status, "probe reported broken page");
            return PageResult::failed(url, PageStatus::Broken(status));
        }
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "probe failed");
            return PageResult::failed(url, PageStatus::Error(e.to_string()));
        }
    }

    let page = match fetcher.fetch(url).await {
        Ok(page) => page,
        Err(e) => {
            warn!(error = %e, "fetch failed");
            return PageResult::failed(url, PageStatus::Error(e.to_string()));
        }
    };

    // HEAD and GET can disagree; trust the GET
    if is_broken_status(page.status) {
        return PageResult::failed(url, PageStatus::Broken(page.status));
    }

    let final_url = normalize(&page.final_url);
    let redirected = (final_url != url).then(|| final_url.clone());

    let links = if page.is_html() {
        // Resolve relative hrefs against where the content actually came from
        extract_links(&extract_anchors(&page.body), &page.final_url, origin)
    } else {
        ExtractedLinks::default()
    };
    debug!(
        internal = links.internal.len(),
        external = links.external.len(),
        "extracted links"
    );

    let (internal, external, broken) = if options.subprobe {
        subprobe_links(fetcher, links, options.subprobe_concurrency).await
    } else {
        (links.internal, links.external, Vec::new())
    };

    PageResult {
        url: url.to_string(),
        final_url: redirected,
        status: PageStatus::Ok(page.status),
        internal,
        external,
        broken,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Internal,
    External,
}

// Probes every extracted link, `concurrency` at a time, and splits out the
// ones that fail. Order within each list is not preserved.
async fn subprobe_links<F>(
    fetcher: &F,
    links: ExtractedLinks,
    concurrency: usize,
) -> (Vec<LinkRecord>, Vec<LinkRecord>, Vec<BrokenLink>)
where
    F: Fetcher + ?Sized,
{
    let candidates = links
        .internal
        .into_iter()
        .map(|link| (Origin::Internal, link))
        .chain(links.external.into_iter().map(|link| (Origin::External, link)));

    // Same pattern as a bounded worker pool: at most `concurrency` probes
    // in flight, results collected as they finish
    let probed: Vec<_> = stream::iter(candidates)
        .map(|(origin, link)| async move {
            let failure = match fetcher.probe(&link.url).await {
                Ok(status) if is_broken_status(status) => Some(LinkFailure::Status(status)),
                Ok(_) => None,
                Err(e) => Some(LinkFailure::Transport(e.to_string())),
            };
            (origin, link, failure)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut internal = Vec::new();
    let mut external = Vec::new();
    let mut broken = Vec::new();
    for (origin, link, failure) in probed {
        match (failure, origin) {
            (Some(failure), _) => broken.push(BrokenLink::new(link, failure)),
            (None, Origin::Internal) => internal.push(link),
            (None, Origin::External) => external.push(link),
        }
    }

    (internal, external, broken)
}
