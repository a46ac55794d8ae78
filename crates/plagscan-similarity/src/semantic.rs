//! Embedding similarity: max cosine between the target and each comparison.
//!
//! Works on raw text. The model comes from a [`ModelRegistry`], so it is
//! loaded once per process and shared by every call.

use ndarray::Array1;
use plagscan_core::{PlagScanConfig, Result, SemanticConfig};
use plagscan_infer::{EmbedderBackend, ModelRegistry};
use tracing::{debug, warn};

use crate::score::{resolve, Score, SimilarityFailure};

/// Substituted for a zero vector norm.
const NORM_EPSILON: f32 = 1e-10;

/// Semantic similarity engine bound to a model registry.
pub struct SemanticEngine<'r> {
    registry: &'r ModelRegistry,
    model_id: String,
    batch_size: usize,
}

impl<'r> SemanticEngine<'r> {
    pub fn new(registry: &'r ModelRegistry, config: &SemanticConfig) -> Self {
        Self {
            registry,
            model_id: config.model_id.clone(),
            batch_size: config.batch_size.max(1),
        }
    }

    /// Maximum cosine similarity in embedding space.
    ///
    /// Empty inputs are reported before the model is touched; a model that
    /// cannot be loaded is `BackendUnavailable`.
    pub fn score(&self, target: &str, comparisons: &[&str]) -> Score {
        if target.trim().is_empty() {
            return Err(SimilarityFailure::EmptyTarget);
        }
        if comparisons.is_empty() {
            return Err(SimilarityFailure::EmptyPopulation);
        }

        let embedder = self
            .registry
            .get_or_load(&self.model_id)
            .map_err(|e| SimilarityFailure::BackendUnavailable(e.to_string()))?;
        semantic_score(target, comparisons, embedder.as_ref(), self.batch_size)
    }
}

/// Score with an already loaded backend.
pub fn semantic_score(
    target: &str,
    comparisons: &[&str],
    embedder: &dyn EmbedderBackend,
    batch_size: usize,
) -> Score {
    if target.trim().is_empty() {
        return Err(SimilarityFailure::EmptyTarget);
    }
    if comparisons.is_empty() {
        return Err(SimilarityFailure::EmptyPopulation);
    }

    let texts: Vec<&str> = std::iter::once(target)
        .chain(comparisons.iter().copied())
        .collect();
    let mut embeddings: Vec<Option<Array1<f32>>> = Vec::with_capacity(texts.len());
    for batch in texts.chunks(batch_size.max(1)) {
        let results = embedder.embed_batch(batch);
        if results.len() != batch.len() {
            return Err(SimilarityFailure::Embedding(format!(
                "backend returned {} embeddings for {} texts",
                results.len(),
                batch.len()
            )));
        }
        embeddings.extend(results.into_iter().map(|r| r.map(|r| r.embedding)));
    }

    let target_vec = embeddings[0]
        .take()
        .ok_or_else(|| SimilarityFailure::Embedding("target could not be embedded".into()))?;

    let mut best: Option<f32> = None;
    for (idx, embedding) in embeddings.iter().enumerate().skip(1) {
        match embedding {
            Some(vec) if vec.len() == target_vec.len() => {
                let sim = cosine(&target_vec, vec);
                if !sim.is_finite() {
                    return Err(SimilarityFailure::NonFinite);
                }
                best = Some(best.map_or(sim, |b| b.max(sim)));
            }
            Some(vec) => {
                return Err(SimilarityFailure::Embedding(format!(
                    "dimension mismatch: {} vs {}",
                    vec.len(),
                    target_vec.len()
                )))
            }
            None => warn!("Comparison {} could not be embedded; skipping", idx - 1),
        }
    }

    let best = best.ok_or_else(|| {
        SimilarityFailure::Embedding("no comparison could be embedded".into())
    })?;
    debug!(
        "Semantic: model={}, {} comparisons, max cosine {:.4}",
        embedder.model_id(),
        comparisons.len(),
        best
    );
    Ok(f64::from(best).clamp(0.0, 1.0))
}

fn cosine(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    let norm_a = non_zero(a.dot(a).sqrt());
    let norm_b = non_zero(b.dot(b).sqrt());
    a.dot(b) / (norm_a * norm_b)
}

fn non_zero(norm: f32) -> f32 {
    if norm == 0.0 {
        NORM_EPSILON
    } else {
        norm
    }
}

/// Semantic similarity through the process-wide registry.
///
/// Model directory and batch size come from the environment
/// (`PlagScanConfig::from_env`). Returns `Error::Config` when the model
/// cannot be loaded; every other failure degrades to 0.0.
pub fn semantic_similarity(target: &str, comparisons: &[&str], model_id: &str) -> Result<f64> {
    let config = SemanticConfig {
        model_id: model_id.to_string(),
        ..PlagScanConfig::from_env().semantic
    };
    let registry = ModelRegistry::global(&config.models_dir);
    resolve(SemanticEngine::new(registry, &config).score(target, comparisons))
}
