// src/config.rs
// =============================================================================
// Tunable settings for the crawler and the keyword analyzer.
//
// Every struct has a Default that is polite enough to point at a real site,
// plus builder-style setters so callers (and tests) only override what they
// care about:
//
//   let config = CrawlConfig::default().max_pages(20).concurrency(4);
//
// The CLI in src/cli.rs maps its flags onto these structs.
// =============================================================================

use std::time::Duration;

/// Browser-like user agent. Some sites answer bots with 403s.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Settings for one crawl session
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Hard cap on pages dispatched to workers
    pub max_pages: usize,
    /// Worker slots per batch
    pub concurrency: usize,
    /// Courtesy pause between batches
    pub batch_delay: Duration,
    /// Timeout for a full GET
    pub fetch_timeout: Duration,
    /// Timeout for a liveness probe (HEAD)
    pub probe_timeout: Duration,
    /// Probe every link found on a page to catch broken ones early
    pub subprobe: bool,
    /// Concurrent sub-probes per page
    pub subprobe_concurrency: usize,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            concurrency: 10,
            batch_delay: Duration::from_millis(500),
            fetch_timeout: Duration::from_secs(8),
            probe_timeout: Duration::from_secs(5),
            subprobe: true,
            subprobe_concurrency: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlConfig {
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn batch_delay(mut self, batch_delay: Duration) -> Self {
        self.batch_delay = batch_delay;
        self
    }

    pub fn fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn subprobe(mut self, subprobe: bool) -> Self {
        self.subprobe = subprobe;
        self
    }

    pub fn subprobe_concurrency(mut self, subprobe_concurrency: usize) -> Self {
        self.subprobe_concurrency = subprobe_concurrency;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Settings for the optional interest-over-time enrichment
#[derive(Debug, Clone)]
pub struct InterestConfig {
    /// Base URL of the interest lookup service
    pub endpoint: String,
    /// How many top terms per n-gram list get a score
    pub top_k: usize,
    /// Minimum gap between two lookups
    pub min_spacing: Duration,
    /// Retries after a rate-limit answer before giving up on a term
    pub max_retries: u32,
    /// First backoff step; doubles on every retry
    pub backoff_base: Duration,
    /// Upper bound for a single backoff sleep
    pub backoff_cap: Duration,
    /// Timeout for a single lookup
    pub timeout: Duration,
}

impl InterestConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            top_k: 5,
            min_spacing: Duration::from_secs(1),
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
            backoff_cap: Duration::from_secs(30),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn min_spacing(mut self, min_spacing: Duration) -> Self {
        self.min_spacing = min_spacing;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn backoff(mut self, base: Duration, cap: Duration) -> Self {
        self.backoff_base = base;
        self.backoff_cap = cap;
        self
    }
}

/// Settings for keyword analysis
#[derive(Debug, Clone)]
pub struct KeywordConfig {
    /// Entries kept per n-gram list
    pub top_n: usize,
    /// URLs analyzed at once by the multi-URL pipeline
    pub concurrency: usize,
    pub fetch_timeout: Duration,
    pub user_agent: String,
    /// Drop English stop words before counting
    pub filter_stop_words: bool,
    /// Interest enrichment, off unless an endpoint is configured
    pub interest: Option<InterestConfig>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            concurrency: 5,
            fetch_timeout: Duration::from_secs(8),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            filter_stop_words: true,
            interest: None,
        }
    }
}

impl KeywordConfig {
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn filter_stop_words(mut self, filter: bool) -> Self {
        self.filter_stop_words = filter;
        self
    }

    pub fn interest(mut self, interest: InterestConfig) -> Self {
        self.interest = Some(interest);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_defaults() {
        let config = CrawlConfig::default();
        assert_eq!(config.max_pages, 100);
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.fetch_timeout, Duration::from_secs(8));
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.subprobe_concurrency, 10);
    }

    #[test]
    fn test_builder_overrides() {
        let config = CrawlConfig::default()
            .max_pages(3)
            .concurrency(1)
            .batch_delay(Duration::ZERO)
            .subprobe(false);
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.batch_delay, Duration::ZERO);
        assert!(!config.subprobe);
    }

    #[test]
    fn test_interest_disabled_by_default() {
        let config = KeywordConfig::default();
        assert!(config.interest.is_none());
        let config = config.interest(InterestConfig::new("http://localhost").top_k(2));
        assert_eq!(config.interest.map(|i| i.top_k), Some(2));
    }
}
