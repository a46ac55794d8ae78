//! Sentence segmentation for surface-level matching.
//!
//! Uses Unicode sentence boundaries (UAX #29). Line breaks are read as
//! spaces, so text wrapped at a fixed width (PDF text layers especially)
//! does not split mid-sentence. If the segmenter yields nothing for
//! non-blank text, the text is split on periods instead.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Split text into raw sentences (untrimmed, unfiltered).
pub fn split_sentences(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    // Same byte length as `text`, so boundaries index into both
    let unwrapped = text.replace(|c: char| c == '\r' || c == '\n', " ");
    let mut boundaries: Vec<usize> = unwrapped
        .split_sentence_bound_indices()
        .map(|(start, _)| start)
        .collect();
    boundaries.push(text.len());

    let segments: Vec<&str> = boundaries
        .windows(2)
        .map(|w| &text[w[0]..w[1]])
        .filter(|s| !s.trim().is_empty())
        .collect();

    if segments.is_empty() {
        return split_on_periods(text);
    }
    segments
}

/// Fallback splitter: every period is a boundary.
pub fn split_on_periods(text: &str) -> Vec<&str> {
    text.split('.').filter(|s| !s.trim().is_empty()).collect()
}

/// Collapse whitespace runs to a single space and trim the ends.
pub fn normalize_whitespace(sentence: &str) -> String {
    WHITESPACE.replace_all(sentence.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_boundaries() {
        let sentences = split_sentences("The first sentence. The second one! Is this third?");
        let trimmed: Vec<&str> = sentences.iter().map(|s| s.trim()).collect();
        assert_eq!(
            trimmed,
            vec!["The first sentence.", "The second one!", "Is this third?"]
        );
    }

    #[test]
    fn test_wrapped_lines_stay_one_sentence() {
        let text = "The committee reviewed the\nproposal in detail. It was\r\napproved.";
        let sentences = split_sentences(text);
        assert_eq!(sentences.len(), 2);
        assert_eq!(
            normalize_whitespace(sentences[0]),
            "The committee reviewed the proposal in detail."
        );
        assert_eq!(normalize_whitespace(sentences[1]), "It was approved.");
    }

    #[test]
    fn test_split_on_periods() {
        assert_eq!(
            split_on_periods("the results were clear.we repeated the trial.again"),
            vec!["the results were clear", "we repeated the trial", "again"]
        );
        assert!(split_on_periods(" . .").is_empty());
    }

    #[test]
    fn test_abbreviations_keep_single_sentence() {
        let text = "The measured results of the second experiment, i.e. the values \
                    recorded by the team, confirmed the hypothesis.";
        assert_eq!(split_sentences(text), vec![text]);

        let url = "Further data is published at www.example.com for every reader";
        assert_eq!(split_sentences(url), vec![url]);
    }

    #[test]
    fn test_decimal_numbers_do_not_trigger_fallback() {
        let sentences = split_sentences("Version 3.5 of the library is faster");
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn test_blank_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("  \n ").is_empty());
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("  many\n\tspaces   here  "),
            "many spaces here"
        );
    }
}
