// src/keywords/rank.rs
// =============================================================================
// Frequency ranking of words and phrases.
//
// How it works:
// 1. Slide a window of N tokens over the content words (N = 1, 2, 3)
// 2. Count each distinct window
// 3. Sort by count, highest first; equal counts keep first-seen order
// 4. Percentage = count / number of windows for that N
//
// With 6 content words there are 6 unigram windows, 5 bigram windows and
// 4 trigram windows, so each list has its own denominator.
// =============================================================================

use crate::error::KeywordError;
use serde::Serialize;
use std::collections::HashMap;

/// One ranked term
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub count: usize,
    /// Share of the windows, e.g. "50.00%"
    pub percentage: String,
    /// Interest score in [0, 1], when enrichment ran and succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_over_time: Option<f64>,
}

/// Ranked unigrams, bigrams and trigrams for one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordReport {
    /// Content words after filtering
    pub total_words: usize,
    pub one_word: Vec<KeywordEntry>,
    pub two_word: Vec<KeywordEntry>,
    pub three_word: Vec<KeywordEntry>,
}

impl KeywordReport {
    pub fn lists_mut(&mut self) -> [&mut Vec<KeywordEntry>; 3] {
        [&mut self.one_word, &mut self.two_word, &mut self.three_word]
    }
}

// Every run of `n` consecutive tokens, joined by single spaces
pub fn ngrams(tokens: &[String], n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    tokens.windows(n).map(|window| window.join(" ")).collect()
}

// Counts and ranks `terms`, keeping the `top_n` most frequent
pub fn rank(terms: &[String], top_n: usize) -> Vec<KeywordEntry> {
    let total = terms.len();
    if total == 0 {
        return Vec::new();
    }

    // term -> (count, index of first appearance)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (index, term) in terms.iter().enumerate() {
        counts.entry(term.as_str()).or_insert((0, index)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(term, (count, first))| (term, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(term, count, _)| KeywordEntry {
            keyword: term.to_string(),
            count,
            percentage: percentage(count, total),
            interest_over_time: None,
        })
        .collect()
}

// Builds the three ranked lists from a filtered token sequence.
//
// Returns NoContent for an empty sequence instead of dividing by zero.
pub fn rank_tokens(tokens: &[String], top_n: usize) -> Result<KeywordReport, KeywordError> {
    if tokens.is_empty() {
        return Err(KeywordError::NoContent);
    }

    Ok(KeywordReport {
        total_words: tokens.len(),
        one_word: rank(&ngrams(tokens, 1), top_n),
        two_word: rank(&ngrams(tokens, 2), top_n),
        three_word: rank(&ngrams(tokens, 3), top_n),
    })
}

fn percentage(count: usize, total: usize) -> String {
    format!("{:.2}%", count as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_ngrams() {
        let words = tokens("cat dog cat bird");
        assert_eq!(ngrams(&words, 2), vec!["cat dog", "dog cat", "cat bird"]);
        assert_eq!(ngrams(&words, 3), vec!["cat dog cat", "dog cat bird"]);
        assert!(ngrams(&words, 5).is_empty());
    }

    #[test]
    fn test_ranking_example() {
        let report = rank_tokens(&tokens("cat dog cat bird cat dog"), 10).unwrap();

        assert_eq!(report.total_words, 6);
        assert_eq!(report.one_word[0].keyword, "cat");
        assert_eq!(report.one_word[0].count, 3);
        assert_eq!(report.one_word[0].percentage, "50.00%");

        assert_eq!(report.two_word[0].keyword, "cat dog");
        assert_eq!(report.two_word[0].count, 2);
        assert_eq!(report.two_word[0].percentage, "40.00%");

        // 4 trigram windows, all distinct
        assert_eq!(report.three_word.len(), 4);
        assert_eq!(report.three_word[0].percentage, "25.00%");
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let ranked = rank(&tokens("zeta alpha mid alpha zeta mid"), 10);
        let order: Vec<_> = ranked.iter().map(|e| e.keyword.as_str()).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_top_n_truncates() {
        let ranked = rank(&tokens("a b c d e f"), 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].percentage, "16.67%");
    }

    #[test]
    fn test_empty_tokens_is_no_content() {
        assert_eq!(rank_tokens(&[], 10), Err(KeywordError::NoContent));
    }

    #[test]
    fn test_single_token_has_no_phrases() {
        let report = rank_tokens(&tokens("solo"), 10).unwrap();
        assert_eq!(report.one_word.len(), 1);
        assert!(report.two_word.is_empty());
        assert!(report.three_word.is_empty());
    }
}
