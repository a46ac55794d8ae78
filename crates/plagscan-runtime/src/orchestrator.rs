//! Orchestrator — runs one plagiarism check end to end.

use std::time::Instant;

use chrono::Utc;
use plagscan_core::{Document, DocumentId, Error, PlagScanConfig, Result};
use plagscan_infer::ModelRegistry;
use plagscan_ingest::extract_document;
use plagscan_similarity::{match_sentences, resolve, LexicalEngine, SemanticEngine};
use tracing::{debug, info, warn};

use crate::types::*;

/// Drives extraction, scoring and sentence matching for a check.
pub struct Orchestrator<'r> {
    config: PlagScanConfig,
    registry: &'r ModelRegistry,
}

impl Orchestrator<'static> {
    /// Orchestrator using the process-wide model registry.
    pub fn new(config: PlagScanConfig) -> Self {
        let registry = ModelRegistry::global(&config.semantic.models_dir);
        Self { config, registry }
    }
}

impl<'r> Orchestrator<'r> {
    /// Orchestrator with its own model registry (for testing).
    pub fn with_registry(config: PlagScanConfig, registry: &'r ModelRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &PlagScanConfig {
        &self.config
    }

    /// Check `target` against `population`.
    ///
    /// Fails only when the target cannot be located (`NotFound`) or the
    /// semantic backend cannot be loaded (`Config`). Members equal to the
    /// target are ignored; unreadable members are listed in `skipped`.
    pub fn run_check(
        &self,
        target: &Document,
        population: &[Document],
        algorithm: Algorithm,
    ) -> Result<ComparisonResult> {
        let start = Instant::now();

        if !target.is_resolvable() {
            return Err(Error::NotFound(format!(
                "document {} at {}",
                target.id,
                target.location()
            )));
        }

        let target_text = match extract_document(target) {
            Ok(text) => text,
            Err(e) => {
                warn!("Target {} is unreadable, scoring as empty: {}", target.id, e);
                String::new()
            }
        };
        let target_has_content = !target_text.trim().is_empty();
        if !target_has_content {
            warn!("Target {} has no extractable content", target.id);
        }

        let members: Vec<&Document> = population.iter().filter(|d| d.id != target.id).collect();
        let compared_with: Vec<DocumentId> = members.iter().map(|d| d.id.clone()).collect();

        let mut aggregate = 0.0;
        let mut report = Vec::new();
        let mut skipped = Vec::new();

        if !members.is_empty() {
            let mut extracted: Vec<(&DocumentId, String)> = Vec::with_capacity(members.len());
            for member in &members {
                match extract_document(member) {
                    Ok(text) => extracted.push((&member.id, text)),
                    Err(e) => {
                        warn!("Skipping document {}: {}", member.id, e);
                        skipped.push(member.id.clone());
                    }
                }
            }

            let texts: Vec<&str> = extracted.iter().map(|(_, text)| text.as_str()).collect();
            aggregate = self.score(&target_text, &texts, algorithm)?;

            for (id, text) in &extracted {
                let matches = match_sentences(&target_text, text, &self.config.matcher);
                debug!("{} sentence matches against {}", matches.len(), id);
                if !matches.is_empty() {
                    report.push(DocumentMatches {
                        compared_with: (*id).clone(),
                        matches,
                    });
                }
            }
        }

        let result = ComparisonResult {
            aggregate_score: aggregate * 100.0,
            algorithm,
            compared_with,
            report,
            target_has_content,
            skipped,
            checked_at: Utc::now(),
            latency_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Check for {}: algorithm={}, score={:.2}%, population={}, skipped={}, latency={}ms",
            target.id,
            algorithm,
            result.aggregate_score,
            result.compared_with.len(),
            result.skipped.len(),
            result.latency_ms
        );
        Ok(result)
    }

    /// Aggregate similarity in `[0, 1]` under the failure policy.
    fn score(&self, target: &str, comparisons: &[&str], algorithm: Algorithm) -> Result<f64> {
        let outcome = match algorithm {
            Algorithm::Lexical => LexicalEngine::new(&self.config.lexical).score(target, comparisons),
            Algorithm::Semantic => {
                SemanticEngine::new(self.registry, &self.config.semantic).score(target, comparisons)
            }
        };
        resolve(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexical_only() -> ModelRegistry {
        ModelRegistry::new(|id| Err(Error::Config(format!("{} not available in tests", id))))
    }

    fn text_doc(id: &str, text: &str) -> Document {
        Document::from_bytes(id, format!("{}.txt", id), text.as_bytes().to_vec())
    }

    #[test]
    fn test_empty_population() {
        let registry = lexical_only();
        let orchestrator = Orchestrator::with_registry(PlagScanConfig::default(), &registry);
        let target = text_doc("1", "An essay about rivers and their deltas.");

        let result = orchestrator.run_check(&target, &[], Algorithm::Lexical).unwrap();
        assert_eq!(result.aggregate_score, 0.0);
        assert!(result.report.is_empty());
        assert!(result.compared_with.is_empty());
        assert_eq!(result.level(), PlagiarismLevel::Low);
    }

    #[test]
    fn test_target_is_excluded_from_population() {
        let registry = lexical_only();
        let orchestrator = Orchestrator::with_registry(PlagScanConfig::default(), &registry);
        let target = text_doc("1", "An essay about rivers and their deltas.");
        let population = vec![target.clone(), text_doc("2", "Mountains form over millions of years.")];

        let result = orchestrator.run_check(&target, &population, Algorithm::Lexical).unwrap();
        assert_eq!(result.compared_with, vec![DocumentId::from("2")]);
        assert!(result.aggregate_score < 100.0);
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let registry = lexical_only();
        let orchestrator = Orchestrator::with_registry(PlagScanConfig::default(), &registry);
        let target = Document::from_path("1", "/no/such/essay.txt");

        let err = orchestrator.run_check(&target, &[], Algorithm::Lexical).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_semantic_without_backend_is_config_error() {
        let registry = lexical_only();
        let orchestrator = Orchestrator::with_registry(PlagScanConfig::default(), &registry);
        let target = text_doc("1", "An essay about rivers and their deltas.");
        let population = vec![text_doc("2", "Another essay about rivers.")];

        let err = orchestrator
            .run_check(&target, &population, Algorithm::Semantic)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
