//! Embedding backend trait.

use ndarray::Array1;

/// Result of an embedding operation.
pub struct EmbeddingResult {
    /// Float32 embedding vector (384-dim for all-MiniLM-L6-v2).
    pub embedding: Array1<f32>,
    /// Whether this was served from cache.
    pub cached: bool,
}

/// Trait for embedding backends.
pub trait EmbedderBackend: Send + Sync {
    /// Identifier of the loaded model.
    fn model_id(&self) -> &str;

    /// Generate an embedding for a text string.
    /// Returns None if inference fails for this text.
    fn embed(&self, text: &str) -> Option<EmbeddingResult>;

    /// Generate embeddings for one batch of texts, in input order.
    fn embed_batch(&self, texts: &[&str]) -> Vec<Option<EmbeddingResult>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;
}
