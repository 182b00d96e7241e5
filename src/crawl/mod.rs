// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Batched concurrent crawling starting from a URL
// - Same-origin restriction (external sites are recorded, never crawled)
// - Hard cap on pages visited
// - Polite crawling with a pause between batches
// - Cooperative cancellation between batches
//
// Submodules:
// - session: frontier, visited set and result accumulators
// - scheduler: the batch loop that drives workers
// - report: the crawl's output and the sitemap writer
// =============================================================================

mod report;
mod scheduler;
mod session;

pub use report::{write_sitemap, CrawlOutcome, CrawlReport};
pub use scheduler::Crawler;

use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::fetch::HttpFetcher;
use std::collections::BTreeSet;

// Builds a crawler that talks to the real network
pub fn http_crawler(config: CrawlConfig) -> Result<Crawler<HttpFetcher>, CrawlError> {
    let fetcher = HttpFetcher::new(config.user_agent.clone(), config.fetch_timeout, config.probe_timeout)?;
    Ok(Crawler::new(fetcher, config))
}

// Crawls a website and returns the full report (internal, external, broken)
pub async fn crawl_website(start_url: &str, config: CrawlConfig) -> Result<CrawlReport, CrawlError> {
    http_crawler(config)?.crawl(start_url).await
}

// Crawls a website and returns just the internal URLs it discovered
pub async fn crawl_internal_urls(
    start_url: &str,
    max_pages: usize,
    concurrency: usize,
) -> Result<BTreeSet<String>, CrawlError> {
    let config = CrawlConfig::default().max_pages(max_pages).concurrency(concurrency);
    let report = crawl_website(start_url, config).await?;
    Ok(report.internal_urls())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_crawl_internal_urls_over_http() {
        let mut server = Server::new_async().await;
        // Mocks stay registered only while their handles are alive
        let mut mocks = Vec::new();
        for path in ["/", "/about", "/gone"] {
            let status = if path == "/gone" { 404 } else { 200 };
            mocks.push(server.mock("HEAD", path).with_status(status).create_async().await);
        }
        let home = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(r#"<a href="/about">About</a> <a href="/gone">Gone</a>"#)
            .create_async()
            .await;
        let about = server
            .mock("GET", "/about")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(r#"<a href="/">Home</a>"#)
            .create_async()
            .await;

        let base = server.url();
        let urls = crawl_internal_urls(&base, 10, 2).await.unwrap();

        let expected: BTreeSet<String> = [base.clone(), format!("{}/about", base)].into_iter().collect();
        assert_eq!(urls, expected);
        home.assert_async().await;
        about.assert_async().await;
        drop(mocks);
    }
}
