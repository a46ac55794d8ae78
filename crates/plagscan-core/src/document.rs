//! Documents handed to the engine by the caller.
//!
//! A document is immutable for the duration of a check; the engine only
//! reads its bytes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque document identifier, assigned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for DocumentId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// Declared document format, taken from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Text,
    Pdf,
    Unsupported,
}

impl DocumentFormat {
    /// Detect format from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" => Self::Text,
            "pdf" => Self::Pdf,
            _ => Self::Unsupported,
        }
    }

    /// Detect format from a path or file name.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unsupported)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Pdf => write!(f, "pdf"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Where a document's bytes come from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// A file on disk, read at extraction time.
    Path(PathBuf),
    /// Bytes already in memory (e.g. an upload the caller has buffered).
    Memory { name: String, bytes: Vec<u8> },
}

/// A document to check or compare against.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub source: DocumentSource,
    pub format: DocumentFormat,
}

impl Document {
    /// A document backed by a file; the format comes from its extension.
    pub fn from_path(id: impl Into<DocumentId>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = DocumentFormat::from_path(&path);
        Self {
            id: id.into(),
            source: DocumentSource::Path(path),
            format,
        }
    }

    /// A document backed by in-memory bytes; `name` supplies the extension.
    pub fn from_bytes(
        id: impl Into<DocumentId>,
        name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let name = name.into();
        let format = DocumentFormat::from_path(Path::new(&name));
        Self {
            id: id.into(),
            source: DocumentSource::Memory {
                name,
                bytes: bytes.into(),
            },
            format,
        }
    }

    /// Whether the byte source can be located at all.
    ///
    /// In-memory documents always resolve; file documents resolve when the
    /// path exists, even if it later turns out to be unreadable.
    pub fn is_resolvable(&self) -> bool {
        match &self.source {
            DocumentSource::Path(path) => path.exists(),
            DocumentSource::Memory { .. } => true,
        }
    }

    /// Human-readable location for log lines.
    pub fn location(&self) -> String {
        match &self.source {
            DocumentSource::Path(path) => path.display().to_string(),
            DocumentSource::Memory { name, .. } => format!("<memory:{}>", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("txt"), DocumentFormat::Text);
        assert_eq!(DocumentFormat::from_extension("PDF"), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_extension("docx"), DocumentFormat::Unsupported);
        assert_eq!(
            DocumentFormat::from_path(Path::new("no_extension")),
            DocumentFormat::Unsupported
        );
    }

    #[test]
    fn test_from_bytes_uses_name_extension() {
        let doc = Document::from_bytes("7", "essay.TXT", b"hello".to_vec());
        assert_eq!(doc.format, DocumentFormat::Text);
        assert_eq!(doc.id.as_str(), "7");
        assert!(doc.is_resolvable());
    }

    #[test]
    fn test_missing_path_is_unresolvable() {
        let doc = Document::from_path(1i64, "/definitely/not/here.txt");
        assert!(!doc.is_resolvable());
        assert_eq!(doc.id, DocumentId::from("1"));
    }
}
