//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

use crate::error::Result;

/// TF-IDF settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalConfig {
    /// Vocabulary cap, by corpus term frequency.
    pub max_features: usize,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            max_features: 20_000,
        }
    }
}

/// Sentence-embedding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Model identifier; also the sub-directory of `models_dir` holding it.
    pub model_id: String,
    /// Texts per inference call.
    pub batch_size: usize,
    /// Root directory for model files (`<models_dir>/<model_id>/model.onnx`).
    pub models_dir: PathBuf,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            model_id: "all-MiniLM-L6-v2".to_string(),
            batch_size: 32,
            models_dir: PathBuf::from("models"),
        }
    }
}

impl SemanticConfig {
    /// Directory holding the files of the configured model.
    pub fn model_dir(&self) -> PathBuf {
        self.models_dir.join(&self.model_id)
    }
}

/// Sentence matcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum ratio for a sentence pair to be reported.
    pub threshold: f64,
    /// Sentences at or below this many trimmed characters are ignored.
    pub min_sentence_chars: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            min_sentence_chars: 10,
        }
    }
}

/// Top-level PlagScan configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlagScanConfig {
    pub lexical: LexicalConfig,
    pub semantic: SemanticConfig,
    pub matcher: MatcherConfig,
}

impl PlagScanConfig {
    /// Defaults overlaid with `PLAGSCAN_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load a JSON config file, then overlay the environment.
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e.into()),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("PLAGSCAN_MODELS_DIR") {
            self.semantic.models_dir = PathBuf::from(dir);
        }
        if let Ok(id) = std::env::var("PLAGSCAN_MODEL_ID") {
            if !id.trim().is_empty() {
                self.semantic.model_id = id.trim().to_string();
            }
        }
        if let Some(n) = env_parse::<usize>("PLAGSCAN_BATCH_SIZE") {
            self.semantic.batch_size = n.max(1);
        }
        if let Some(t) = env_parse::<f64>("PLAGSCAN_MATCH_THRESHOLD") {
            self.matcher.threshold = t.clamp(0.0, 1.0);
        }
        if let Some(n) = env_parse::<usize>("PLAGSCAN_MAX_FEATURES") {
            self.lexical.max_features = n;
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlagScanConfig::default();
        assert_eq!(config.lexical.max_features, 20_000);
        assert_eq!(config.semantic.model_id, "all-MiniLM-L6-v2");
        assert_eq!(config.semantic.batch_size, 32);
        assert_eq!(config.matcher.threshold, 0.8);
        assert_eq!(config.matcher.min_sentence_chars, 10);
        assert_eq!(
            config.semantic.model_dir(),
            PathBuf::from("models").join("all-MiniLM-L6-v2")
        );
    }

    #[test]
    fn test_load_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plagscan.json");
        std::fs::write(&path, r#"{"matcher": {"threshold": 0.9}}"#).unwrap();

        let config = PlagScanConfig::load(&path).unwrap();
        assert_eq!(config.matcher.threshold, 0.9);
        assert_eq!(config.matcher.min_sentence_chars, 10);
        assert_eq!(config.semantic.batch_size, 32);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlagScanConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.lexical.max_features, 20_000);
    }

    #[test]
    fn test_load_malformed_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            PlagScanConfig::load(&path),
            Err(crate::Error::Json(_))
        ));
    }
}
