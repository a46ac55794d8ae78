//! TF-IDF vector space with max cosine similarity.
//!
//! The vocabulary and IDF weights are built from exactly the documents of
//! one call and dropped afterwards. Weighting: raw term counts times the
//! smoothed IDF `ln((1 + n) / (1 + df)) + 1`, rows L2-normalized.

use std::collections::{BTreeMap, HashMap};

use ndarray::{s, Array2};
use plagscan_core::LexicalConfig;
use plagscan_ingest::tokens;
use tracing::debug;

use crate::score::{resolve, Score, SimilarityFailure};

/// TF-IDF similarity engine.
#[derive(Debug, Clone)]
pub struct LexicalEngine {
    max_features: usize,
}

impl Default for LexicalEngine {
    fn default() -> Self {
        Self::new(&LexicalConfig::default())
    }
}

impl LexicalEngine {
    pub fn new(config: &LexicalConfig) -> Self {
        Self {
            max_features: config.max_features,
        }
    }

    /// Maximum cosine similarity between `target` and any comparison.
    pub fn score(&self, target: &str, comparisons: &[&str]) -> Score {
        if target.is_empty() {
            return Err(SimilarityFailure::EmptyTarget);
        }
        if comparisons.is_empty() {
            return Err(SimilarityFailure::EmptyPopulation);
        }

        let docs: Vec<Vec<String>> = std::iter::once(target)
            .chain(comparisons.iter().copied())
            .map(tokens)
            .collect();
        if docs.iter().all(|d| d.is_empty()) {
            return Err(SimilarityFailure::EmptyVocabulary);
        }

        let vocabulary = self.build_vocabulary(&docs);
        if vocabulary.is_empty() {
            return Err(SimilarityFailure::EmptyVocabulary);
        }
        let matrix = tfidf_matrix(&docs, &vocabulary);

        let target_row = matrix.row(0);
        let similarities = matrix.slice(s![1.., ..]).dot(&target_row);
        if similarities.iter().any(|v| !v.is_finite()) {
            return Err(SimilarityFailure::NonFinite);
        }

        let best = similarities.iter().copied().fold(0.0_f64, f64::max);
        debug!(
            "TF-IDF: {} docs, {} terms, max cosine {:.4}",
            docs.len(),
            vocabulary.len(),
            best
        );
        Ok(best.clamp(0.0, 1.0))
    }

    /// Term -> column index, in sorted term order. When capped, keeps the
    /// terms with the highest corpus frequency (ties: alphabetical).
    fn build_vocabulary(&self, docs: &[Vec<String>]) -> BTreeMap<String, usize> {
        let mut corpus_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in docs {
            for term in doc {
                *corpus_counts.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
        if self.max_features > 0 && terms.len() > self.max_features {
            terms.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
            terms.truncate(self.max_features);
            terms.sort_by(|a, b| a.0.cmp(b.0));
        }

        terms
            .into_iter()
            .enumerate()
            .map(|(idx, (term, _))| (term.to_string(), idx))
            .collect()
    }
}

/// One L2-normalized TF-IDF row per document.
fn tfidf_matrix(docs: &[Vec<String>], vocabulary: &BTreeMap<String, usize>) -> Array2<f64> {
    let n_docs = docs.len();
    let mut matrix = Array2::<f64>::zeros((n_docs, vocabulary.len()));
    let mut df = vec![0usize; vocabulary.len()];

    for (row, doc) in docs.iter().enumerate() {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in doc {
            if let Some(&col) = vocabulary.get(term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }
        for (col, count) in counts {
            matrix[[row, col]] = count;
            df[col] += 1;
        }
    }

    let n = n_docs as f64;
    for (col, &doc_freq) in df.iter().enumerate() {
        let idf = ((1.0 + n) / (1.0 + doc_freq as f64)).ln() + 1.0;
        matrix.column_mut(col).mapv_inplace(|tf| tf * idf);
    }

    for mut row in matrix.rows_mut() {
        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row /= norm;
        }
    }
    matrix
}

/// Lexical similarity with default settings; never fails.
pub fn lexical_similarity(target: &str, comparisons: &[&str]) -> f64 {
    resolve(LexicalEngine::default().score(target, comparisons)).unwrap_or(0.0)
}
