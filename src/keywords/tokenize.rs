// src/keywords/tokenize.rs
// =============================================================================
// Splits text into lowercase word tokens and keeps the content words.
//
// A token is a run of ASCII letters, at least two long, optionally with one
// internal apostrophe ("don't", "rust's"). Digits and punctuation split
// tokens and are dropped.
// =============================================================================

use super::stopwords::StopWords;
use regex::Regex;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]+'?[a-z]+\b").expect("word pattern is valid"));

// Lowercases `text` and returns every word token in order
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

// True for tokens that can be keywords: well-formed and not a stop word
pub fn is_content_word(token: &str, stop_words: &StopWords) -> bool {
    is_word_shaped(token) && !stop_words.contains(token)
}

// The filtered token sequence the n-gram windows slide over
pub fn content_words(text: &str, stop_words: &StopWords) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| is_content_word(token, stop_words))
        .collect()
}

fn is_word_shaped(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.len() < 2 {
        return false;
    }
    let apostrophes = bytes.iter().filter(|b| **b == b'\'').count();
    let first = bytes[0];
    let last = bytes[bytes.len() - 1];

    apostrophes <= 1
        && first.is_ascii_alphabetic()
        && last.is_ascii_alphabetic()
        && bytes.iter().all(|b| b.is_ascii_alphabetic() || *b == b'\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        assert_eq!(
            tokenize("Rust, RUST! rust-lang 2024"),
            vec!["rust", "rust", "rust", "lang"]
        );
    }

    #[test]
    fn test_tokenize_keeps_internal_apostrophe() {
        assert_eq!(tokenize("Don't stop: it's Rust's year"), vec!["don't", "stop", "it's", "rust's", "year"]);
    }

    #[test]
    fn test_single_letters_are_dropped() {
        assert_eq!(tokenize("a b cd e"), vec!["cd"]);
    }

    #[test]
    fn test_content_word_predicate() {
        let stop_words = StopWords::english();
        assert!(is_content_word("crawler", &stop_words));
        assert!(is_content_word("rust's", &stop_words));
        assert!(!is_content_word("the", &stop_words));
        assert!(!is_content_word("x", &stop_words));
        assert!(!is_content_word("a'b'c", &stop_words));
        assert!(!is_content_word("'quoted", &stop_words));
        assert!(!is_content_word("web2", &stop_words));
    }

    #[test]
    fn test_content_words_filters_stop_words() {
        let words = content_words("The crawler and the frontier", &StopWords::english());
        assert_eq!(words, vec!["crawler", "frontier"]);
    }
}
