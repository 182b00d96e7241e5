// src/keywords/analyze.rs
// =============================================================================
// The per-URL keyword pipeline:
//
//   fetch -> visible text -> content words -> ranked n-grams -> enrichment
//
// It runs independently of the crawl loop and uses its own fetcher.
// Several URLs can be analyzed in one call; each gets its own result, so one
// bad URL never spoils the rest.
// =============================================================================

use super::interest::ThrottledInterest;
use super::rank::{rank_tokens, KeywordReport};
use super::stopwords::StopWords;
use super::tokenize::content_words;
use crate::config::KeywordConfig;
use crate::error::KeywordError;
use crate::fetch::{is_broken_status, Fetcher, HttpFetcher};
use crate::page::extract_visible_text;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument};

/// The outcome for one URL of a multi-URL run
#[derive(Debug)]
pub struct UrlKeywords {
    pub url: String,
    pub result: Result<KeywordReport, KeywordError>,
}

// Ranks the keywords of plain text. No I/O.
pub fn analyze_text(text: &str, stop_words: &StopWords, top_n: usize) -> Result<KeywordReport, KeywordError> {
    let words = content_words(text, stop_words);
    rank_tokens(&words, top_n)
}

pub struct KeywordAnalyzer<F> {
    fetcher: F,
    config: KeywordConfig,
    stop_words: StopWords,
    interest: Option<ThrottledInterest>,
}

impl<F: Fetcher> KeywordAnalyzer<F> {
    pub fn new(fetcher: F, config: KeywordConfig) -> Self {
        let stop_words = if config.filter_stop_words {
            StopWords::english()
        } else {
            StopWords::none()
        };

        Self {
            fetcher,
            config,
            stop_words,
            interest: None,
        }
    }

    pub fn with_interest(mut self, interest: ThrottledInterest) -> Self {
        self.interest = Some(interest);
        self
    }

    // Fetches `url` and ranks the words on it.
    //
    // Errors:
    //   MalformedInput: empty URL
    //   Transport / HttpStatus: the page could not be retrieved
    //   NoContent: nothing left after stop-word filtering
    #[instrument(skip(self))]
    pub async fn analyze_url(&self, url: &str) -> Result<KeywordReport, KeywordError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(KeywordError::MalformedInput("URL is required".to_string()));
        }

        let page = self.fetcher.fetch(url).await?;
        if is_broken_status(page.status) {
            return Err(KeywordError::HttpStatus(page.status));
        }

        let text = extract_visible_text(&page.body);
        let mut report = analyze_text(&text, &self.stop_words, self.config.top_n)?;
        info!(words = report.total_words, "ranked keywords");

        if let Some(interest) = &self.interest {
            interest.enrich(&mut report).await;
        }

        Ok(report)
    }

    // Analyzes several URLs, a few at a time, returning results in input
    // order. Only an empty list is an error.
    pub async fn analyze_urls(&self, urls: &[String]) -> Result<Vec<UrlKeywords>, KeywordError> {
        if urls.is_empty() {
            return Err(KeywordError::MalformedInput("at least one URL is required".to_string()));
        }

        let results = stream::iter(urls)
            .map(|url| async move {
                UrlKeywords {
                    url: url.clone(),
                    result: self.analyze_url(url).await,
                }
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        Ok(results)
    }
}

// Builds an analyzer that talks to the real network, with interest
// enrichment when the config names an endpoint
pub fn http_analyzer(config: KeywordConfig) -> Result<KeywordAnalyzer<HttpFetcher>, reqwest::Error> {
    let fetcher = HttpFetcher::new(config.user_agent.clone(), config.fetch_timeout, config.fetch_timeout)?;
    let interest = config.interest.as_ref().map(ThrottledInterest::from_config).transpose()?;

    let analyzer = KeywordAnalyzer::new(fetcher, config);
    Ok(match interest {
        Some(interest) => analyzer.with_interest(interest),
        None => analyzer,
    })
}
