// src/fetch/stub.rs
// =============================================================================
// An in-memory website for tests.
//
// Pages are registered by URL with a status and an HTML body. Lookups go
// through canonical::normalize so "https://example.com/" and
// "https://example.com" hit the same page. Unknown URLs behave like a
// server that refuses connections.
//
// The stub counts every fetch and probe so tests can assert how much work the
// crawler did. With a latency set, each call sleeps while it is "in flight"
// and the stub remembers the most calls it ever had in flight at once.
// =============================================================================

use super::{FetchedPage, Fetcher};
use crate::canonical::normalize;
use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
struct StubPage {
    status: u16,
    body: String,
    redirect_to: Option<String>,
}

#[derive(Debug, Default)]
pub struct StubFetcher {
    pages: HashMap<String, StubPage>,
    fetches: AtomicUsize,
    probes: AtomicUsize,
    fetched_urls: Mutex<Vec<String>>,
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

// Counts one call as in flight until dropped
struct InFlight<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, high_water: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        high_water.fetch_max(now, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    // Registers a 200 OK HTML page
    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(
            normalize(url),
            StubPage {
                status: 200,
                body: body.to_string(),
                redirect_to: None,
            },
        );
        self
    }

    // Registers a URL that answers with `status` and an empty body
    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(
            normalize(url),
            StubPage {
                status,
                body: String::new(),
                redirect_to: None,
            },
        );
        self
    }

    // Registers a URL whose GET ends up at `target` (which must also exist)
    pub fn redirect(mut self, url: &str, target: &str) -> Self {
        self.pages.insert(
            normalize(url),
            StubPage {
                status: 200,
                body: String::new(),
                redirect_to: Some(target.to_string()),
            },
        );
        self
    }

    // Every fetch and probe takes `latency` before answering
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    // Highest number of fetches and probes that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched_urls.lock().map(|urls| urls.clone()).unwrap_or_default()
    }

    fn lookup(&self, url: &str) -> Result<(String, &StubPage), TransportError> {
        let key = normalize(url);
        let page = self.pages.get(&key).ok_or(TransportError::Connect)?;
        match &page.redirect_to {
            Some(target) => {
                let target_key = normalize(target);
                let target_page = self.pages.get(&target_key).ok_or(TransportError::Connect)?;
                Ok((target.clone(), target_page))
            }
            None => Ok((url.to_string(), page)),
        }
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut urls) = self.fetched_urls.lock() {
            urls.push(normalize(url));
        }
        self.simulate_latency().await;

        let (final_url, page) = self.lookup(url)?;
        Ok(FetchedPage {
            status: page.status,
            final_url,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: page.body.clone(),
        })
    }

    async fn probe(&self, url: &str) -> Result<u16, TransportError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        let (_, page) = self.lookup(url)?;
        Ok(page.status)
    }
}
