// src/crawl/session.rs
// =============================================================================
// The shared state of one crawl.
//
// Every URL the crawl sees gets a stable integer id the first time it shows
// up (an interned string table). The frontier, the visited set and the result
// accumulators all store ids, not strings.
//
// Life of an internal URL:
//
//   discovered -> frontier -> in flight (popped by the scheduler)
//              -> visited (merged back, whatever the outcome)
//
// Invariants:
// - a URL is never in the frontier and the visited set at the same time
// - a page is enqueued at most once per crawl, whatever its scheme
// - visited and the accumulators only ever grow
//
// The report drops internal links whose page turned out to be broken.
//
// The scheduler owns the session and is the only writer. Workers never see
// it; they hand back a PageResult that the scheduler merges here.
// =============================================================================

use super::report::{CrawlOutcome, CrawlReport};
use crate::canonical::{normalize, origin_host, page_key};
use crate::page::{BrokenLink, LinkRecord, PageResult};
use std::collections::{HashMap, HashSet};
use url::Url;

/// Stable handle for an interned URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UrlId(u32);

// Interned canonical URLs: id -> string and string -> id
#[derive(Debug, Default)]
struct UrlTable {
    ids: HashMap<String, UrlId>,
    urls: Vec<String>,
}

impl UrlTable {
    fn intern(&mut self, url: &str) -> UrlId {
        if let Some(id) = self.ids.get(url) {
            return *id;
        }
        let id = UrlId(self.urls.len() as u32);
        self.urls.push(url.to_string());
        self.ids.insert(url.to_string(), id);
        id
    }

    fn resolve(&self, id: UrlId) -> &str {
        &self.urls[id.0 as usize]
    }
}

/// Sizes of every collection, for progress logs and invariant checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub frontier: usize,
    pub visited: usize,
    pub internal: usize,
    pub external: usize,
    pub broken: usize,
}

#[derive(Debug)]
pub struct CrawlSession {
    origin: String,
    seed: UrlId,
    urls: UrlTable,
    frontier: HashSet<UrlId>,
    in_flight: HashSet<UrlId>,
    visited: HashSet<UrlId>,
    // Every id ever put in the frontier, so nothing is enqueued twice
    enqueued: HashSet<UrlId>,
    // Scheme-less page key -> the id the page was first seen under
    pages: HashMap<String, UrlId>,
    // Internal links with the record of their first discovery
    internal: HashMap<UrlId, LinkRecord>,
    external: HashMap<UrlId, LinkRecord>,
    broken: HashMap<UrlId, BrokenLink>,
}

impl CrawlSession {
    // Starts a session with the seed in the frontier and already counted as
    // an internal link, so it shows up in the output even if nothing links
    // back to it.
    pub fn new(origin: impl Into<String>, seed_url: &str) -> Self {
        let mut urls = UrlTable::default();
        let seed_url = normalize(seed_url);
        let seed = urls.intern(&seed_url);

        Self {
            origin: origin.into(),
            seed,
            urls,
            frontier: HashSet::from([seed]),
            in_flight: HashSet::new(),
            visited: HashSet::new(),
            enqueued: HashSet::from([seed]),
            pages: HashMap::from([(page_key(&seed_url).to_string(), seed)]),
            internal: HashMap::from([(seed, LinkRecord::seed(seed_url))]),
            external: HashMap::new(),
            broken: HashMap::new(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn seed(&self) -> UrlId {
        self.seed
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            frontier: self.frontier.len(),
            visited: self.visited.len(),
            internal: self.internal.len(),
            external: self.external.len(),
            broken: self.broken.len(),
        }
    }

    // Removes up to min(concurrency, |frontier|, max_pages - |visited|) URLs
    // from the frontier and marks them in flight. Which URLs come out is
    // unspecified.
    //
    // The size computation and the pop happen under the same &mut borrow,
    // so no one can change the frontier in between.
    pub fn pop_batch(&mut self, concurrency: usize, max_pages: usize) -> Vec<(UrlId, String)> {
        let remaining = max_pages.saturating_sub(self.visited.len() + self.in_flight.len());
        let batch_size = concurrency.min(self.frontier.len()).min(remaining);

        let ids: Vec<UrlId> = self.frontier.iter().take(batch_size).copied().collect();
        ids.into_iter()
            .map(|id| {
                self.frontier.remove(&id);
                self.in_flight.insert(id);
                (id, self.urls.resolve(id).to_string())
            })
            .collect()
    }

    // Folds one worker's result back into the session.
    //
    // The page becomes visited no matter how it went. A page that failed is
    // recorded as broken, attributed to wherever we first found it.
    pub fn merge(&mut self, id: UrlId, result: PageResult) {
        self.in_flight.remove(&id);
        self.visited.insert(id);

        if let Some(failure) = result.status.failure() {
            let link = self
                .internal
                .get(&id)
                .cloned()
                .unwrap_or_else(|| LinkRecord::seed(result.url.clone()));
            self.broken.entry(id).or_insert_with(|| BrokenLink::new(link, failure));
        }

        // A redirect target is a link like any other, found on this page
        if let Some(final_url) = result.final_url {
            let anchor_text = self
                .internal
                .get(&id)
                .map(|record| record.anchor_text.clone())
                .unwrap_or_default();
            let record = LinkRecord::new(final_url, &anchor_text, result.url.clone());
            if self.is_internal(&record.url) {
                self.discover_internal(record);
            } else {
                self.discover_external(record);
            }
        }

        for record in result.internal {
            self.discover_internal(record);
        }
        for record in result.external {
            self.discover_external(record);
        }
        for broken in result.broken {
            let target = match self.pages.get(page_key(broken.url())) {
                Some(id) => *id,
                None => self.urls.intern(broken.url()),
            };
            self.broken.entry(target).or_insert(broken);
        }
    }

    fn discover_internal(&mut self, record: LinkRecord) {
        let id = self.urls.intern(&record.url);
        // http:// and https:// spellings of a page share the first id seen
        let id = *self.pages.entry(page_key(&record.url).to_string()).or_insert(id);
        self.internal.entry(id).or_insert(record);
        // `enqueued` covers the frontier, in-flight and visited URLs alike
        if self.enqueued.insert(id) {
            self.frontier.insert(id);
        }
    }

    fn discover_external(&mut self, record: LinkRecord) {
        let id = self.urls.intern(&record.url);
        self.external.entry(id).or_insert(record);
    }

    fn is_internal(&self, url: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|parsed| origin_host(&parsed))
            .is_some_and(|host| host == self.origin)
    }

    // True when no URL sits in both the frontier and the visited set
    pub fn frontier_is_disjoint(&self) -> bool {
        self.frontier.is_disjoint(&self.visited)
    }

    // Consumes the session into the caller-facing report. A page that was
    // discovered as internal but then failed is reported as broken only.
    pub fn into_report(self, outcome: CrawlOutcome) -> CrawlReport {
        let start_url = self.urls.resolve(self.seed).to_string();
        let broken = &self.broken;
        let internal = self
            .internal
            .into_iter()
            .filter(|(id, _)| !broken.contains_key(id))
            .map(|(_, record)| record)
            .collect();
        CrawlReport::new(
            start_url,
            outcome,
            self.visited.len(),
            internal,
            self.external.into_values().collect(),
            self.broken.into_values().collect(),
        )
    }
}
