//! PlagScan Infer — sentence-embedding backends, embedding cache, model registry.
//!
//! Provides the `EmbedderBackend` trait. With the `onnx` feature enabled,
//! `OnnxEmbedder` runs a SentenceTransformers export (all-MiniLM-L6-v2 by
//! default). Without it, loading any model is a configuration error: the
//! semantic algorithm cannot run and must say so.

pub mod cache;
pub mod embedder;
pub mod onnx_embedder;
pub mod registry;

pub use cache::EmbeddingCache;
pub use embedder::{EmbedderBackend, EmbeddingResult};
pub use registry::{load_embedder, ModelRegistry};

#[cfg(feature = "onnx")]
pub use onnx_embedder::OnnxEmbedder;
