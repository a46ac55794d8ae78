//! ONNX-based sentence-embedding engine.
//!
//! Loads a SentenceTransformers ONNX export and its tokenizer and produces
//! mean-pooled float32 embeddings. Requires the `onnx` feature.

#[cfg(feature = "onnx")]
mod inner {
    use std::path::Path;
    use std::sync::Arc;

    use ndarray::Array1;
    use ort::session::Session;
    use ort::value::Tensor;
    use parking_lot::Mutex;
    use tokenizers::{Tokenizer, TruncationParams};
    use tracing::{debug, info, warn};

    use crate::cache::EmbeddingCache;
    use crate::embedder::{EmbedderBackend, EmbeddingResult};

    /// Longer inputs are truncated, as SentenceTransformers does for MiniLM.
    const MAX_SEQ_LEN: usize = 256;

    /// Default embedding dimension (all-MiniLM-L6-v2).
    const DEFAULT_DIM: usize = 384;

    /// ONNX sentence-embedding engine.
    pub struct OnnxEmbedder {
        model_id: String,
        session: Arc<Mutex<Session>>,
        tokenizer: Tokenizer,
        cache: EmbeddingCache,
        dimension: usize,
    }

    impl OnnxEmbedder {
        /// Load an ONNX model and tokenizer from the given directory.
        ///
        /// Expects:
        /// - `model_dir/model.onnx` — the ONNX model file
        /// - `model_dir/tokenizer.json` — the HuggingFace tokenizer
        pub fn load(model_dir: &Path, model_id: &str) -> Result<Self, String> {
            let model_path = model_dir.join("model.onnx");
            let tokenizer_path = model_dir.join("tokenizer.json");

            if !model_path.exists() {
                return Err(format!("Model not found: {}", model_path.display()));
            }
            if !tokenizer_path.exists() {
                return Err(format!("Tokenizer not found: {}", tokenizer_path.display()));
            }

            // With load-dynamic, ORT_DYLIB_PATH must point to libonnxruntime.so
            ort::init().commit();

            let session = Session::builder()
                .map_err(|e| format!("Failed to create session builder: {}", e))?
                .with_intra_threads(2)
                .map_err(|e| format!("Failed to set threads: {}", e))?
                .commit_from_file(&model_path)
                .map_err(|e| format!("Failed to load ONNX model: {}", e))?;

            let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| format!("Failed to load tokenizer: {}", e))?;
            truncate_to_max_len(&mut tokenizer)?;

            info!(
                "ONNX embedder loaded: model={}, dim={}, path={}",
                model_id,
                DEFAULT_DIM,
                model_path.display()
            );

            Ok(Self {
                model_id: model_id.to_string(),
                session: Arc::new(Mutex::new(session)),
                tokenizer,
                cache: EmbeddingCache::default_cache(),
                dimension: DEFAULT_DIM,
            })
        }

        /// Run one padded batch through the model.
        ///
        /// The tokenizer already truncates to `MAX_SEQ_LEN` with `[CLS]` and
        /// `[SEP]` kept, so no encoding is longer than that.
        fn infer_batch(&self, texts: &[&str]) -> Option<Vec<Array1<f32>>> {
            let encodings = self
                .tokenizer
                .encode_batch(texts.to_vec(), true)
                .map_err(|e| warn!("Tokenization failed: {}", e))
                .ok()?;

            let batch = encodings.len();
            let seq_len = encodings
                .iter()
                .map(|e| e.get_ids().len())
                .max()
                .unwrap_or(0);
            if batch == 0 || seq_len == 0 {
                return None;
            }

            // Row-major [batch, seq_len], zero-padded
            let mut ids_data = vec![0i64; batch * seq_len];
            let mut mask_data = vec![0i64; batch * seq_len];
            let type_ids_data = vec![0i64; batch * seq_len];
            for (row, encoding) in encodings.iter().enumerate() {
                let ids = encoding.get_ids();
                let mask = encoding.get_attention_mask();
                for i in 0..ids.len().min(seq_len) {
                    ids_data[row * seq_len + i] = ids[i] as i64;
                    mask_data[row * seq_len + i] = mask[i] as i64;
                }
            }
            let mask_f32: Vec<f32> = mask_data.iter().map(|&m| m as f32).collect();

            let ids_tensor = Tensor::from_array(([batch, seq_len], ids_data))
                .map_err(|e| warn!("Failed to create ids tensor: {}", e))
                .ok()?;
            let mask_tensor = Tensor::from_array(([batch, seq_len], mask_data))
                .map_err(|e| warn!("Failed to create mask tensor: {}", e))
                .ok()?;
            let type_ids_tensor = Tensor::from_array(([batch, seq_len], type_ids_data))
                .map_err(|e| warn!("Failed to create type_ids tensor: {}", e))
                .ok()?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![ids_tensor, mask_tensor, type_ids_tensor])
                .map_err(|e| warn!("ONNX inference failed: {}", e))
                .ok()?;

            // Either token embeddings [batch, seq_len, dim] that need mean
            // pooling, or an already pooled [batch, dim].
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| warn!("Failed to extract output tensor: {}", e))
                .ok()?;
            let shape_dims: Vec<i64> = shape.iter().copied().collect();

            let mut embeddings = Vec::with_capacity(batch);
            if shape_dims.len() == 3 {
                let out_seq = shape_dims[1] as usize;
                let dim = shape_dims[2] as usize;
                for row in 0..batch {
                    let row_mask = &mask_f32[row * seq_len..(row + 1) * seq_len];
                    let mask_sum: f32 = row_mask.iter().sum();
                    if mask_sum < 1e-9 {
                        return None;
                    }
                    let mut pooled = Array1::zeros(dim);
                    for (i, &m) in row_mask.iter().enumerate().take(out_seq) {
                        if m > 0.0 {
                            let offset = (row * out_seq + i) * dim;
                            for d in 0..dim {
                                pooled[d] += data[offset + d] * m;
                            }
                        }
                    }
                    embeddings.push(pooled / mask_sum);
                }
            } else if shape_dims.len() == 2 {
                let dim = shape_dims[1] as usize;
                for row in 0..batch {
                    embeddings.push(Array1::from_vec(data[row * dim..(row + 1) * dim].to_vec()));
                }
            } else {
                warn!("Unexpected output shape: {:?}", shape_dims);
                return None;
            }

            debug!("Embedded batch of {} (seq_len={})", batch, seq_len);
            Some(embeddings)
        }
    }

    impl EmbedderBackend for OnnxEmbedder {
        fn model_id(&self) -> &str {
            &self.model_id
        }

        fn embed(&self, text: &str) -> Option<EmbeddingResult> {
            self.embed_batch(&[text]).pop().flatten()
        }

        fn embed_batch(&self, texts: &[&str]) -> Vec<Option<EmbeddingResult>> {
            let mut results: Vec<Option<EmbeddingResult>> = texts
                .iter()
                .map(|t| {
                    self.cache.get(t).map(|embedding| EmbeddingResult {
                        embedding,
                        cached: true,
                    })
                })
                .collect();

            let misses: Vec<usize> = (0..texts.len()).filter(|&i| results[i].is_none()).collect();
            if misses.is_empty() {
                return results;
            }

            let miss_texts: Vec<&str> = misses.iter().map(|&i| texts[i]).collect();
            if let Some(embeddings) = self.infer_batch(&miss_texts) {
                for (&i, embedding) in misses.iter().zip(embeddings) {
                    self.cache.put(texts[i], embedding.clone());
                    results[i] = Some(EmbeddingResult {
                        embedding,
                        cached: false,
                    });
                }
            }
            results
        }

        fn dimension(&self) -> usize {
            self.dimension
        }
    }

    /// Cap encodings at `MAX_SEQ_LEN` tokens, special tokens included.
    fn truncate_to_max_len(tokenizer: &mut Tokenizer) -> Result<(), String> {
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQ_LEN,
                ..TruncationParams::default()
            }))
            .map_err(|e| format!("Failed to configure truncation: {}", e))?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::str::FromStr;

        const WORD_LEVEL: &str = r#"{
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": { "type": "Whitespace" },
            "post_processor": {
                "type": "BertProcessing",
                "sep": ["[SEP]", 2],
                "cls": ["[CLS]", 1]
            },
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": { "[UNK]": 0, "[CLS]": 1, "[SEP]": 2, "word": 3 },
                "unk_token": "[UNK]"
            }
        }"#;

        #[test]
        fn test_truncation_keeps_sep() {
            let mut tokenizer = Tokenizer::from_str(WORD_LEVEL).unwrap();
            truncate_to_max_len(&mut tokenizer).unwrap();

            let long = "word ".repeat(MAX_SEQ_LEN * 2);
            let encoding = tokenizer.encode(long.as_str(), true).unwrap();
            let ids = encoding.get_ids();
            assert_eq!(ids.len(), MAX_SEQ_LEN);
            assert_eq!(ids[0], 1);
            assert_eq!(ids[MAX_SEQ_LEN - 1], 2);

            let short = tokenizer.encode("word word", true).unwrap();
            assert_eq!(short.get_ids(), &[1, 3, 3, 2]);
        }
    }
}

#[cfg(feature = "onnx")]
pub use inner::OnnxEmbedder;
