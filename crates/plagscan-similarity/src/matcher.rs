//! Near-duplicate sentence pairs between two raw documents.
//!
//! Greedy: every sentence of A is paired with its single best match in B,
//! so one B sentence may back several A sentences, and `match(a, b)` is not
//! the mirror of `match(b, a)`. Cost is |A| x |B| ratio computations.

use std::collections::HashMap;

use plagscan_core::MatcherConfig;
use plagscan_ingest::sentences::{normalize_whitespace, split_sentences};
use serde::{Deserialize, Serialize};

/// Strings at least this long get the popular-character heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// A sentence of the target and the population sentence it resembles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceMatch {
    pub source_sentence: String,
    pub matched_sentence: String,
    /// Ratio in `[0, 1]`, rounded to 4 decimals.
    pub score: f64,
}

/// Sentence pairs from `text_a` to `text_b` scoring at least the threshold,
/// in the order of the sentences of `text_a`.
pub fn match_sentences(text_a: &str, text_b: &str, config: &MatcherConfig) -> Vec<SentenceMatch> {
    if text_a.is_empty() || text_b.is_empty() {
        return Vec::new();
    }

    let sentences_a = candidate_sentences(text_a, config.min_sentence_chars);
    let sentences_b: Vec<(String, SequenceMatcher)> =
        candidate_sentences(text_b, config.min_sentence_chars)
            .into_iter()
            .map(|s| {
                let matcher = SequenceMatcher::new(&s.to_lowercase());
                (s, matcher)
            })
            .collect();
    if sentences_b.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for sentence in sentences_a {
        let lowered: Vec<char> = sentence.to_lowercase().chars().collect();
        let mut best_score = 0.0;
        let mut best_match: Option<&str> = None;
        for (candidate, matcher) in &sentences_b {
            let score = matcher.ratio(&lowered);
            if score > best_score {
                best_score = score;
                best_match = Some(candidate.as_str());
            }
        }
        if let Some(matched) = best_match {
            if best_score >= config.threshold {
                matches.push(SentenceMatch {
                    source_sentence: sentence,
                    matched_sentence: matched.to_string(),
                    score: round4(best_score),
                });
            }
        }
    }
    matches
}

fn candidate_sentences(text: &str, min_chars: usize) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .filter(|s| s.trim().chars().count() > min_chars)
        .map(normalize_whitespace)
        .collect()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Similarity ratio `2·M / (|a| + |b|)`, where M is the number of
/// characters in Ratcliff/Obershelp matching blocks. Case-sensitive.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    SequenceMatcher::new(b).ratio(&a)
}

/// Matching-block finder with the index of `b` precomputed, so one `b` can
/// be compared against many `a`.
struct SequenceMatcher {
    b: Vec<char>,
    /// Positions of each character in `b`, minus popular characters.
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    fn new(b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        // Characters making up more than 1% of a long b are not indexed
        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }
        Self { b, b2j }
    }

    fn ratio(&self, a: &[char]) -> f64 {
        let total = a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matched_chars(a) as f64 / total as f64
    }

    fn matched_chars(&self, a: &[char]) -> usize {
        let mut matched = 0;
        let mut queue = vec![(0, a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        matched
    }

    /// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`, earliest in
    /// `a` then `b` on ties, as `(i, j, len)`.
    fn longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);

        // Length of the match ending at a[i - 1], b[j]
        let mut run_lengths: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next_runs = HashMap::new();
            if let Some(positions) = self.b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let len = j
                        .checked_sub(1)
                        .and_then(|prev| run_lengths.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_runs.insert(j, len);
                    if len > best_len {
                        best_i = i + 1 - len;
                        best_j = j + 1 - len;
                        best_len = len;
                    }
                }
            }
            run_lengths = next_runs;
        }

        // Popular characters were left out of the index; grow the block
        // over any equal neighbours.
        while best_i > alo && best_j > blo && a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && a[best_i + best_len] == self.b[best_j + best_len]
        {
            best_len += 1;
        }

        (best_i, best_j, best_len)
    }
}
