//! PlagScan Ingest — text extraction, normalization, sentence segmentation.

pub mod file;
pub mod normalize;
pub mod sentences;

pub use file::{extract_document, extract_path, extract_text};
pub use normalize::{normalize_text, tokens};
pub use sentences::split_sentences;
