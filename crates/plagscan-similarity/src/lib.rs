//! PlagScan Similarity — lexical and semantic scoring, sentence matching.
//!
//! Engines return a [`Score`]: either a value in `[0, 1]` or a tagged
//! [`SimilarityFailure`]. What a failure means for the caller (silent zero,
//! logged zero, or a hard error) is decided in one place, [`resolve`].

pub mod lexical;
pub mod matcher;
pub mod score;
pub mod semantic;

pub use lexical::{lexical_similarity, LexicalEngine};
pub use matcher::{match_sentences, sequence_ratio, SentenceMatch};
pub use score::{resolve, Disposition, Score, SimilarityFailure};
pub use semantic::{semantic_score, semantic_similarity, SemanticEngine};
