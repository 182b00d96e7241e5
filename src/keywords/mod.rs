// src/keywords/mod.rs
// =============================================================================
// Keyword and phrase frequency analysis for a page.
//
// Submodules:
// - stopwords: the built-in English stop-word list
// - tokenize: text -> lowercase content words
// - rank: content words -> ranked unigrams, bigrams and trigrams
// - interest: optional, rate-limited interest-over-time enrichment
// - analyze: the fetch -> text -> rank -> enrich pipeline
// =============================================================================

mod analyze;
mod interest;
mod rank;
mod stopwords;
mod tokenize;

pub use analyze::{analyze_text, http_analyzer, KeywordAnalyzer, UrlKeywords};
pub use interest::{HttpInterestSource, InterestSource, ThrottledInterest};
pub use rank::{ngrams, rank, rank_tokens, KeywordEntry, KeywordReport};
pub use stopwords::StopWords;
pub use tokenize::{content_words, is_content_word, tokenize};
