//! Canonicalization of raw text for statistical comparison.
//!
//! Non-letters become spaces, text is lower-cased, stopwords and tokens of
//! two characters or fewer are dropped, and the rest are lemmatized.

pub mod lemmatizer;
pub mod stopwords;

use once_cell::sync::Lazy;
use regex::Regex;

use lemmatizer::lemmatize;
use stopwords::is_stopword;

static NON_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\s]").unwrap());

/// Normalized tokens in document order.
pub fn tokens(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let letters_only = NON_LETTER.replace_all(text, " ");
    letters_only
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > 2 && !is_stopword(w))
        .map(lemmatize)
        .collect()
}

/// Whitespace-joined lemmas; empty when nothing survives.
pub fn normalize_text(text: &str) -> String {
    tokens(text).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(
            normalize_text("Hello world submission"),
            "hello world submission"
        );
        assert_eq!(
            normalize_text("The students were running experiments!"),
            "student run experiment"
        );
    }

    #[test]
    fn test_punctuation_does_not_fuse_words() {
        assert_eq!(normalize_text("data,structure"), "data structure");
        assert_eq!(normalize_text("alpha-beta"), "alpha beta");
        assert_eq!(normalize_text("room42kitchen"), "room kitchen");
    }

    #[test]
    fn test_short_tokens_and_stopwords_dropped() {
        assert_eq!(normalize_text("It is an ox in a box"), "box");
        assert_eq!(normalize_text("the of and"), "");
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("123 456 !!! ???"), "");
        assert!(tokens("   \n\t ").is_empty());
    }

    #[test]
    fn test_non_ascii_letters_survive() {
        assert_eq!(normalize_text("Café résumé"), "café résumé");
    }
}
