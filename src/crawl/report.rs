// src/crawl/report.rs
// =============================================================================
// What a finished crawl hands back, plus the sitemap writer.
//
// The report lists are sorted by URL so two runs over the same site print
// the same thing, whatever order the workers happened to finish in.
// =============================================================================

use crate::page::{BrokenLink, LinkFailure, LinkRecord};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlOutcome {
    /// The frontier emptied: every reachable page was visited
    Drained,
    /// The page cap was reached with URLs still waiting
    Capped,
    /// The cancel flag was raised between batches
    Cancelled,
    /// The start URL itself was broken, nothing was crawled
    SeedUnreachable,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub start_url: String,
    pub outcome: CrawlOutcome,
    /// Pages dispatched to a worker, successful or not
    pub pages_visited: usize,
    /// Why the start URL failed, for SeedUnreachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_failure: Option<LinkFailure>,
    pub internal: Vec<LinkRecord>,
    pub external: Vec<LinkRecord>,
    pub broken: Vec<BrokenLink>,
}

impl CrawlReport {
    pub fn new(
        start_url: String,
        outcome: CrawlOutcome,
        pages_visited: usize,
        mut internal: Vec<LinkRecord>,
        mut external: Vec<LinkRecord>,
        mut broken: Vec<BrokenLink>,
    ) -> Self {
        internal.sort_by(|a, b| a.url.cmp(&b.url));
        external.sort_by(|a, b| a.url.cmp(&b.url));
        broken.sort_by(|a, b| a.url().cmp(b.url()));

        Self {
            start_url,
            outcome,
            pages_visited,
            seed_failure: None,
            internal,
            external,
            broken,
        }
    }

    // The empty result returned when the start URL does not answer
    pub fn seed_unreachable(start_url: String, failure: LinkFailure) -> Self {
        Self {
            seed_failure: Some(failure),
            ..Self::new(start_url, CrawlOutcome::SeedUnreachable, 1, Vec::new(), Vec::new(), Vec::new())
        }
    }

    // All internal URLs discovered: the crawl's primary output
    pub fn internal_urls(&self) -> BTreeSet<String> {
        self.internal.iter().map(|link| link.url.clone()).collect()
    }

    pub fn has_broken_links(&self) -> bool {
        !self.broken.is_empty() || self.seed_failure.is_some()
    }
}

// Writes one URL per line, sorted, to `path`
//
// Example output:
//   https://example.com
//   https://example.com/about
pub fn write_sitemap<'a>(path: &Path, urls: impl IntoIterator<Item = &'a str>) -> io::Result<usize> {
    let sorted: BTreeSet<&str> = urls.into_iter().collect();

    let mut writer = BufWriter::new(File::create(path)?);
    for url in &sorted {
        writeln!(writer, "{}", url)?;
    }
    writer.flush()?;

    Ok(sorted.len())
}
