//! Process-wide registry of loaded embedding models.
//!
//! Models are expensive to load, so each model id is loaded at most once and
//! shared by every subsequent check. The lock is held across the load, which
//! serializes first use: two concurrent first calls never load twice.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use plagscan_core::{Error, Result};
use tracing::info;

use crate::embedder::EmbedderBackend;

type Loader = Box<dyn Fn(&str) -> Result<Arc<dyn EmbedderBackend>> + Send + Sync>;

static GLOBAL: OnceCell<ModelRegistry> = OnceCell::new();

/// Lazily populated map of model id to loaded backend.
pub struct ModelRegistry {
    models: Mutex<HashMap<String, Arc<dyn EmbedderBackend>>>,
    loader: Loader,
}

impl ModelRegistry {
    /// Registry that loads models through the given function.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn(&str) -> Result<Arc<dyn EmbedderBackend>> + Send + Sync + 'static,
    {
        Self {
            models: Mutex::new(HashMap::new()),
            loader: Box::new(loader),
        }
    }

    /// Registry that loads `<models_dir>/<model_id>/` with the ONNX backend.
    pub fn with_models_dir(models_dir: PathBuf) -> Self {
        Self::new(move |model_id| load_embedder(&models_dir.join(model_id), model_id))
    }

    /// The process-wide registry. `models_dir` only takes effect on first call.
    pub fn global(models_dir: &Path) -> &'static ModelRegistry {
        GLOBAL.get_or_init(|| Self::with_models_dir(models_dir.to_path_buf()))
    }

    /// Return the loaded model, loading it on first use.
    pub fn get_or_load(&self, model_id: &str) -> Result<Arc<dyn EmbedderBackend>> {
        let mut models = self.models.lock();
        if let Some(model) = models.get(model_id) {
            return Ok(Arc::clone(model));
        }

        let model = (self.loader)(model_id)?;
        info!("Embedding model loaded: {} (dim={})", model_id, model.dimension());
        models.insert(model_id.to_string(), Arc::clone(&model));
        Ok(model)
    }

    /// Register an already constructed backend under its own model id.
    pub fn insert(&self, model: Arc<dyn EmbedderBackend>) {
        self.models.lock().insert(model.model_id().to_string(), model);
    }

    pub fn is_loaded(&self, model_id: &str) -> bool {
        self.models.lock().contains_key(model_id)
    }

    /// Drop every loaded model; the next use reloads.
    pub fn reset(&self) {
        self.models.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.models.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load a model from disk with the compiled-in backend.
pub fn load_embedder(model_dir: &Path, model_id: &str) -> Result<Arc<dyn EmbedderBackend>> {
    #[cfg(feature = "onnx")]
    {
        let embedder = crate::onnx_embedder::OnnxEmbedder::load(model_dir, model_id)
            .map_err(|e| Error::Config(format!("embedding model {} unavailable: {}", model_id, e)))?;
        Ok(Arc::new(embedder))
    }

    #[cfg(not(feature = "onnx"))]
    {
        let _ = model_dir;
        Err(Error::Config(format!(
            "embedding model {} unavailable: built without the `onnx` feature",
            model_id
        )))
    }
}
