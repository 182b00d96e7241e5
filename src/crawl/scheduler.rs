// src/crawl/scheduler.rs
// =============================================================================
// This module implements the crawl loop.
//
// How it works:
// 1. Seed the frontier with the start URL
// 2. Pop a batch of up to `concurrency` URLs (never past the page cap)
// 3. Spawn one worker task per URL; each runs the page processor
// 4. Wait for the WHOLE batch (a barrier: no pipelining across batches)
// 5. Merge every result into the session, then pause before the next batch
// 6. Stop when the frontier is empty, the cap is reached or we are cancelled
//
// Politeness:
// - At most `concurrency` pages in flight at once
// - A fixed pause between batches
// - Only same-origin pages are ever fetched in full
//
// Phases: Idle -> Running -> (Draining | Capped | Cancelled) -> Done
//
// Rust concepts:
// - Arc: shares one fetcher between worker tasks
// - tokio::spawn + JoinHandle: one task per page, awaited as a group
// - AtomicBool: a cancel flag that another task (Ctrl-C handler) can raise
// =============================================================================

use super::report::{CrawlOutcome, CrawlReport};
use super::session::{CrawlSession, UrlId};
use crate::canonical::{origin_host, parse_absolute};
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::fetch::Fetcher;
use crate::page::{process_page, PageResult, PageStatus, ProcessOptions};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CrawlPhase {
    Idle,
    Running,
    Draining,
    Capped,
    Cancelled,
    Done,
}

pub struct Crawler<F> {
    fetcher: Arc<F>,
    config: CrawlConfig,
    cancel: Arc<AtomicBool>,
}

impl<F> Crawler<F>
where
    F: Fetcher + 'static,
{
    pub fn new(fetcher: F, config: CrawlConfig) -> Self {
        Self::with_shared_fetcher(Arc::new(fetcher), config)
    }

    pub fn with_shared_fetcher(fetcher: Arc<F>, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    // Handle for stopping the crawl from elsewhere. Checked at the top of
    // every batch; pages already in flight finish normally.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    // Crawls the site behind `start_url`.
    //
    // Returns: the report, or an error if the input is unusable. An
    // unreachable start URL is NOT an error: it yields an empty report with
    // outcome SeedUnreachable.
    pub async fn crawl(&self, start_url: &str) -> Result<CrawlReport, CrawlError> {
        if start_url.trim().is_empty() {
            return Err(CrawlError::MalformedInput("start URL is required".to_string()));
        }
        if self.config.max_pages == 0 {
            return Err(CrawlError::MalformedInput("max pages must be at least 1".to_string()));
        }
        if self.config.concurrency == 0 {
            return Err(CrawlError::MalformedInput("concurrency must be at least 1".to_string()));
        }

        let (start, seed_url) = parse_absolute(start_url)?;
        if !matches!(start.scheme(), "http" | "https") {
            return Err(CrawlError::MalformedInput(format!(
                "unsupported scheme '{}' in {}",
                start.scheme(),
                start_url
            )));
        }
        let origin = origin_host(&start)
            .ok_or_else(|| CrawlError::MalformedInput(format!("URL has no host: {}", start_url)))?;

        let mut phase = CrawlPhase::Idle;
        let mut session = CrawlSession::new(origin, &seed_url);
        transition(&mut phase, CrawlPhase::Running);
        info!(
            start = %seed_url,
            max_pages = self.config.max_pages,
            concurrency = self.config.concurrency,
            "starting crawl"
        );

        let mut seed_checked = false;
        while phase == CrawlPhase::Running {
            // Cooperative cancellation point
            if self.cancel.load(Ordering::SeqCst) {
                transition(&mut phase, CrawlPhase::Cancelled);
                break;
            }

            let batch = session.pop_batch(self.config.concurrency, self.config.max_pages);
            if batch.is_empty() {
                let next = if session.frontier_len() == 0 {
                    CrawlPhase::Draining
                } else {
                    CrawlPhase::Capped
                };
                transition(&mut phase, next);
                break;
            }

            debug!(batch = batch.len(), visited = session.visited_len(), "dispatching batch");
            let results = self.run_batch(batch, session.origin()).await;

            for (id, result) in results {
                if !seed_checked && id == session.seed() {
                    if let Some(failure) = result.status.failure() {
                        warn!(start = %seed_url, reason = %failure, "start URL is unreachable");
                        transition(&mut phase, CrawlPhase::Done);
                        return Ok(CrawlReport::seed_unreachable(seed_url, failure));
                    }
                    seed_checked = true;
                }
                session.merge(id, result);
            }
            debug_assert!(session.frontier_is_disjoint());

            let stats = session.stats();
            info!(
                visited = stats.visited,
                frontier = stats.frontier,
                internal = stats.internal,
                external = stats.external,
                broken = stats.broken,
                "batch merged"
            );

            // Courtesy pause, skipped when there is nothing left to fetch
            let more_to_do = stats.frontier > 0 && stats.visited < self.config.max_pages;
            if more_to_do && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }
        }

        let outcome = match phase {
            CrawlPhase::Capped => CrawlOutcome::Capped,
            CrawlPhase::Cancelled => CrawlOutcome::Cancelled,
            _ => CrawlOutcome::Drained,
        };
        transition(&mut phase, CrawlPhase::Done);

        let report = session.into_report(outcome);
        info!(
            pages = report.pages_visited,
            internal = report.internal.len(),
            outcome = ?report.outcome,
            "crawl finished"
        );
        Ok(report)
    }

    // Runs one batch: one spawned task per URL, then waits for all of them.
    //
    // A panicking worker only loses its own page, which is reported with an
    // error status like any other failure.
    async fn run_batch(&self, batch: Vec<(UrlId, String)>, origin: &str) -> Vec<(UrlId, PageResult)> {
        let options = ProcessOptions {
            subprobe: self.config.subprobe,
            subprobe_concurrency: self.config.subprobe_concurrency,
        };

        let handles: Vec<_> = batch
            .into_iter()
            .map(|(id, url)| {
                let fetcher = Arc::clone(&self.fetcher);
                let origin = origin.to_string();
                let task_url = url.clone();
                let handle = tokio::spawn(async move {
                    process_page(fetcher.as_ref(), &task_url, &origin, options).await
                });
                (id, url, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (id, url, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!(url = %url, error = %e, "worker task failed");
                    PageResult::failed(url, PageStatus::Error(format!("worker failed: {}", e)))
                }
            };
            results.push((id, result));
        }
        results
    }
}

fn transition(phase: &mut CrawlPhase, next: CrawlPhase) {
    debug!(from = ?*phase, to = ?next, "crawl phase");
    *phase = next;
}
