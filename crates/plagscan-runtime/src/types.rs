//! Result types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use plagscan_core::{DocumentId, Error};
use plagscan_similarity::SentenceMatch;
use serde::{Deserialize, Serialize};

/// Scoring algorithm for the aggregate score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// TF-IDF over normalized text.
    #[default]
    #[serde(rename = "LEXICAL", alias = "TF-IDF")]
    Lexical,
    /// Sentence-embedding cosine over raw text.
    #[serde(rename = "SEMANTIC", alias = "BERT")]
    Semantic,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "LEXICAL",
            Self::Semantic => "SEMANTIC",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEXICAL" | "TF-IDF" | "TFIDF" => Ok(Self::Lexical),
            "SEMANTIC" | "BERT" => Ok(Self::Semantic),
            other => Err(Error::Config(format!("unknown algorithm: {}", other))),
        }
    }
}

/// Coarse reading of the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlagiarismLevel {
    High,
    Moderate,
    Low,
}

impl PlagiarismLevel {
    /// Level for a 0–100 score.
    pub fn from_percent(score: f64) -> Self {
        if score >= 70.0 {
            Self::High
        } else if score >= 40.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// Sentence matches against one population member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMatches {
    pub compared_with: DocumentId,
    pub matches: Vec<SentenceMatch>,
}

/// Outcome of one check.
///
/// Scores from different algorithms are not calibrated against each other;
/// compare `aggregate_score` only between results with the same `algorithm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Maximum similarity to any population member, 0–100.
    pub aggregate_score: f64,
    pub algorithm: Algorithm,
    /// Every population member except the target itself.
    pub compared_with: Vec<DocumentId>,
    /// Members with at least one matching sentence, in population order.
    pub report: Vec<DocumentMatches>,
    /// False when nothing could be extracted from the target.
    pub target_has_content: bool,
    /// Members dropped because their text could not be read.
    #[serde(default)]
    pub skipped: Vec<DocumentId>,
    pub checked_at: DateTime<Utc>,
    pub latency_ms: u64,
}

impl ComparisonResult {
    pub fn level(&self) -> PlagiarismLevel {
        PlagiarismLevel::from_percent(self.aggregate_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_names() {
        assert_eq!(serde_json::to_string(&Algorithm::Lexical).unwrap(), "\"LEXICAL\"");
        assert_eq!(serde_json::to_string(&Algorithm::Semantic).unwrap(), "\"SEMANTIC\"");

        let legacy: Algorithm = serde_json::from_str("\"BERT\"").unwrap();
        assert_eq!(legacy, Algorithm::Semantic);
        let legacy: Algorithm = serde_json::from_str("\"TF-IDF\"").unwrap();
        assert_eq!(legacy, Algorithm::Lexical);
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("lexical".parse::<Algorithm>().unwrap(), Algorithm::Lexical);
        assert_eq!("tf-idf".parse::<Algorithm>().unwrap(), Algorithm::Lexical);
        assert_eq!(" Semantic ".parse::<Algorithm>().unwrap(), Algorithm::Semantic);
        assert_eq!("bert".parse::<Algorithm>().unwrap(), Algorithm::Semantic);
        assert!("cosine".parse::<Algorithm>().is_err());
        assert_eq!(Algorithm::default(), Algorithm::Lexical);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(PlagiarismLevel::from_percent(100.0), PlagiarismLevel::High);
        assert_eq!(PlagiarismLevel::from_percent(70.0), PlagiarismLevel::High);
        assert_eq!(PlagiarismLevel::from_percent(69.99), PlagiarismLevel::Moderate);
        assert_eq!(PlagiarismLevel::from_percent(40.0), PlagiarismLevel::Moderate);
        assert_eq!(PlagiarismLevel::from_percent(39.9), PlagiarismLevel::Low);
        assert_eq!(PlagiarismLevel::from_percent(0.0), PlagiarismLevel::Low);
    }
}
