//! PlagScan Core — document model, error taxonomy, configuration.

pub mod config;
pub mod document;
pub mod error;

pub use config::{LexicalConfig, MatcherConfig, PlagScanConfig, SemanticConfig};
pub use document::{Document, DocumentFormat, DocumentId, DocumentSource};
pub use error::{Error, Result};
