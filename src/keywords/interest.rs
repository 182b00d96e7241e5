// src/keywords/interest.rs
// =============================================================================
// Optional "interest over time" enrichment for top keywords.
//
// Pieces:
// - InterestSource: the lookup boundary (keyword -> score or nothing)
// - HttpInterestSource: a JSON-over-HTTP adapter for that boundary
// - ThrottledInterest: wraps any source with its own rate limiter, retries
//   rate-limit answers with jittered exponential backoff, and swallows
//   every failure into "no score"
//
// This limiter is separate from the crawler's batch pause; the two never
// share state.
// =============================================================================

use super::rank::KeywordReport;
use crate::config::InterestConfig;
use crate::error::InterestError;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use rand::{thread_rng, Rng};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, warn};

#[async_trait]
pub trait InterestSource: Send + Sync {
    /// Score in [0, 1] for `keyword`, or None when the source has no data
    async fn interest(&self, keyword: &str) -> Result<Option<f64>, InterestError>;
}

#[derive(Debug, Deserialize)]
struct InterestPayload {
    score: Option<f64>,
}

// Queries `GET {endpoint}?keyword=<keyword>` and expects `{"score": 0.42}`.
//
// HTTP 429 becomes InterestError::RateLimited, carrying Retry-After when
// the server sent one.
#[derive(Debug, Clone)]
pub struct HttpInterestSource {
    client: Client,
    endpoint: String,
}

impl HttpInterestSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl InterestSource for HttpInterestSource {
    async fn interest(&self, keyword: &str) -> Result<Option<f64>, InterestError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("keyword", keyword)])
            .send()
            .await
            .map_err(|e| InterestError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(InterestError::RateLimited { retry_after });
        }
        if !status.is_success() {
            return Err(InterestError::Unavailable(format!("HTTP {}", status.as_u16())));
        }

        let payload: InterestPayload = response
            .json()
            .await
            .map_err(|e| InterestError::Unavailable(e.to_string()))?;
        Ok(payload.score)
    }
}

pub struct ThrottledInterest {
    source: Box<dyn InterestSource>,
    limiter: DefaultDirectRateLimiter,
    top_k: usize,
    max_retries: u32,
    backoff_base: Duration,
    backoff_cap: Duration,
}

impl ThrottledInterest {
    pub fn new(source: impl InterestSource + 'static, config: &InterestConfig) -> Self {
        // A zero spacing means "no limit"; governor wants a non-zero period
        let quota = Quota::with_period(config.min_spacing).unwrap_or_else(|| Quota::per_second(NonZeroU32::MAX));

        Self {
            source: Box::new(source),
            limiter: RateLimiter::direct(quota),
            top_k: config.top_k,
            max_retries: config.max_retries,
            backoff_base: config.backoff_base,
            backoff_cap: config.backoff_cap,
        }
    }

    // Builds the HTTP adapter described by `config`
    pub fn from_config(config: &InterestConfig) -> Result<Self, reqwest::Error> {
        let source = HttpInterestSource::new(config.endpoint.clone(), config.timeout)?;
        Ok(Self::new(source, config))
    }

    // Looks up one keyword. Never fails: rate limits are retried up to
    // max_retries times, anything else (or running out of retries) gives None.
    pub async fn interest(&self, keyword: &str) -> Option<f64> {
        let mut attempt = 0;
        loop {
            self.limiter.until_ready().await;

            match self.source.interest(keyword).await {
                Ok(score) => return score.filter(|s| s.is_finite()).map(|s| s.clamp(0.0, 1.0)),
                Err(InterestError::RateLimited { retry_after }) if attempt < self.max_retries => {
                    let delay = backoff_delay(self.backoff_base, self.backoff_cap, attempt, retry_after);
                    debug!(keyword, attempt, delay_ms = delay.as_millis() as u64, "interest lookup rate limited");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(keyword, error = %e, "interest lookup failed");
                    return None;
                }
            }
        }
    }

    // Scores the top-K entries of every list in `report`, one at a time
    pub async fn enrich(&self, report: &mut KeywordReport) {
        let top_k = self.top_k;
        for list in report.lists_mut() {
            for entry in list.iter_mut().take(top_k) {
                entry.interest_over_time = self.interest(&entry.keyword).await;
            }
        }
    }
}

// base * 2^attempt (the server's Retry-After replaces base), capped, then
// scaled by a random factor in [0.8, 1.2)
fn backoff_delay(base: Duration, cap: Duration, attempt: u32, retry_after: Option<Duration>) -> Duration {
    let base = retry_after.unwrap_or(base);
    let exponential = base.saturating_mul(2u32.saturating_pow(attempt)).min(cap);
    let jitter = thread_rng().gen_range(0.8..1.2);
    exponential.mul_f64(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::rank::rank_tokens;
    use mockito::{Matcher, Server};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // Answers RateLimited `failures` times, then `score`
    struct Scripted {
        calls: Arc<AtomicUsize>,
        failures: usize,
        score: Result<Option<f64>, InterestError>,
    }

    #[async_trait]
    impl InterestSource for Scripted {
        async fn interest(&self, _keyword: &str) -> Result<Option<f64>, InterestError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(InterestError::RateLimited { retry_after: None });
            }
            self.score.clone()
        }
    }

    fn fast_config() -> InterestConfig {
        InterestConfig::new("http://unused")
            .min_spacing(Duration::from_millis(1))
            .max_retries(2)
            .backoff(Duration::from_millis(1), Duration::from_millis(5))
    }

    fn scripted(failures: usize, score: Result<Option<f64>, InterestError>) -> (ThrottledInterest, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Scripted {
            calls: Arc::clone(&calls),
            failures,
            score,
        };
        (ThrottledInterest::new(source, &fast_config()), calls)
    }

    #[tokio::test]
    async fn test_retries_after_rate_limit() {
        let (interest, calls) = scripted(2, Ok(Some(0.5)));
        assert_eq!(interest.interest("rust").await, Some(0.5));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let (interest, calls) = scripted(10, Ok(Some(0.5)));
        assert_eq!(interest.interest("rust").await, None);
        // first attempt + 2 retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let (interest, calls) = scripted(0, Err(InterestError::Unavailable("down".to_string())));
        assert_eq!(interest.interest("rust").await, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scores_are_clamped() {
        let (interest, _) = scripted(0, Ok(Some(1.7)));
        assert_eq!(interest.interest("rust").await, Some(1.0));
    }

    #[tokio::test]
    async fn test_enrich_only_top_k() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Scripted {
            calls: Arc::clone(&calls),
            failures: 0,
            score: Ok(Some(0.25)),
        };
        let interest = ThrottledInterest::new(source, &fast_config().top_k(1));

        let tokens: Vec<String> = "cat dog cat bird".split(' ').map(str::to_string).collect();
        let mut report = rank_tokens(&tokens, 10).unwrap();
        interest.enrich(&mut report).await;

        assert_eq!(report.one_word[0].interest_over_time, Some(0.25));
        assert_eq!(report.one_word[1].interest_over_time, None);
        assert_eq!(report.two_word[0].interest_over_time, Some(0.25));
        assert_eq!(report.three_word[0].interest_over_time, Some(0.25));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_lookups_are_spaced() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Scripted {
            calls: Arc::clone(&calls),
            failures: 0,
            score: Ok(Some(0.5)),
        };
        let config = fast_config().min_spacing(Duration::from_millis(40));
        let interest = ThrottledInterest::new(source, &config);

        // governor keeps its own clock, so this measures wall time
        let started = std::time::Instant::now();
        for keyword in ["one", "two", "three"] {
            interest.interest(keyword).await;
        }
        let elapsed = started.elapsed();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // The first lookup goes straight through, the next two wait a slot each
        assert!(elapsed >= Duration::from_millis(75), "elapsed {:?}", elapsed);
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let base = Duration::from_millis(100);
        let cap = Duration::from_secs(1);

        let first = backoff_delay(base, cap, 0, None);
        assert!(first >= Duration::from_millis(80) && first < Duration::from_millis(120));

        let third = backoff_delay(base, cap, 2, None);
        assert!(third >= Duration::from_millis(320) && third < Duration::from_millis(480));

        let capped = backoff_delay(base, cap, 20, None);
        assert!(capped < Duration::from_millis(1200));

        let server_hint = backoff_delay(base, cap, 0, Some(Duration::from_millis(500)));
        assert!(server_hint >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_http_source_reads_score() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/interest")
            .match_query(Matcher::UrlEncoded("keyword".into(), "web crawler".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"score": 0.42}"#)
            .create_async()
            .await;

        let source = HttpInterestSource::new(format!("{}/interest", server.url()), Duration::from_secs(5)).unwrap();
        assert_eq!(source.interest("web crawler").await, Ok(Some(0.42)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_source_maps_429() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/interest")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_header("retry-after", "7")
            .create_async()
            .await;

        let source = HttpInterestSource::new(format!("{}/interest", server.url()), Duration::from_secs(5)).unwrap();
        assert_eq!(
            source.interest("rust").await,
            Err(InterestError::RateLimited {
                retry_after: Some(Duration::from_secs(7))
            })
        );
    }

    #[tokio::test]
    async fn test_http_source_server_error_is_unavailable() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/interest")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let source = HttpInterestSource::new(format!("{}/interest", server.url()), Duration::from_secs(5)).unwrap();
        assert!(matches!(
            source.interest("rust").await,
            Err(InterestError::Unavailable(_))
        ));
    }
}
