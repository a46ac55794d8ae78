//! Score outcome and failure policy.

use plagscan_core::{Error, Result};
use thiserror::Error;
use tracing::{debug, warn};

/// Outcome of one engine call.
pub type Score = std::result::Result<f64, SimilarityFailure>;

/// Why an engine could not produce a score.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityFailure {
    #[error("target text is empty")]
    EmptyTarget,

    #[error("no comparison documents")]
    EmptyPopulation,

    #[error("no terms left after normalization")]
    EmptyVocabulary,

    #[error("similarity was not a finite number")]
    NonFinite,

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("embedding backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// How the orchestrator treats a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Nothing to compare; 0.0 is the correct answer.
    NoSignal,
    /// Computation went wrong; report 0.0 and log it.
    Degraded,
    /// The algorithm cannot run at all; surface as a configuration error.
    Fatal,
}

impl SimilarityFailure {
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::EmptyTarget | Self::EmptyPopulation | Self::EmptyVocabulary => {
                Disposition::NoSignal
            }
            Self::NonFinite | Self::Embedding(_) => Disposition::Degraded,
            Self::BackendUnavailable(_) => Disposition::Fatal,
        }
    }
}

/// Apply the failure policy: a score in `[0, 1]` or a fatal error.
pub fn resolve(outcome: Score) -> Result<f64> {
    match outcome {
        Ok(score) if score.is_finite() => Ok(score.clamp(0.0, 1.0)),
        Ok(_) => resolve(Err(SimilarityFailure::NonFinite)),
        Err(failure) => match failure.disposition() {
            Disposition::NoSignal => {
                debug!("No similarity signal: {}", failure);
                Ok(0.0)
            }
            Disposition::Degraded => {
                warn!("Similarity degraded to 0.0: {}", failure);
                Ok(0.0)
            }
            Disposition::Fatal => Err(Error::Config(failure.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        assert_eq!(SimilarityFailure::EmptyTarget.disposition(), Disposition::NoSignal);
        assert_eq!(SimilarityFailure::EmptyPopulation.disposition(), Disposition::NoSignal);
        assert_eq!(SimilarityFailure::EmptyVocabulary.disposition(), Disposition::NoSignal);
        assert_eq!(SimilarityFailure::NonFinite.disposition(), Disposition::Degraded);
        assert_eq!(
            SimilarityFailure::Embedding("bad batch".into()).disposition(),
            Disposition::Degraded
        );
        assert_eq!(
            SimilarityFailure::BackendUnavailable("no onnx".into()).disposition(),
            Disposition::Fatal
        );
    }

    #[test]
    fn test_resolve_clamps() {
        assert_eq!(resolve(Ok(1.0000001)).unwrap(), 1.0);
        assert_eq!(resolve(Ok(-0.2)).unwrap(), 0.0);
        assert_eq!(resolve(Ok(0.42)).unwrap(), 0.42);
        assert_eq!(resolve(Ok(f64::NAN)).unwrap(), 0.0);
    }

    #[test]
    fn test_resolve_downgrades_and_propagates() {
        assert_eq!(resolve(Err(SimilarityFailure::EmptyTarget)).unwrap(), 0.0);
        assert_eq!(resolve(Err(SimilarityFailure::NonFinite)).unwrap(), 0.0);
        assert!(matches!(
            resolve(Err(SimilarityFailure::BackendUnavailable("missing".into()))),
            Err(Error::Config(_))
        ));
    }
}
