//! Text extraction for submitted documents.
//!
//! `extract_document` reports failures as errors so the orchestrator can
//! drop unreadable population members; `extract_text` is the total variant
//! that degrades every failure to an empty string.

use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use plagscan_core::{Document, DocumentFormat, DocumentSource, Error, Result};
use tracing::{debug, warn};

/// Extract text, returning an error when the bytes cannot be read or parsed.
///
/// Unsupported formats are not an error: they yield `Ok("")`.
pub fn extract_document(doc: &Document) -> Result<String> {
    if doc.format == DocumentFormat::Unsupported {
        debug!("Unsupported format for document {}: {}", doc.id, doc.location());
        return Ok(String::new());
    }

    let bytes = read_bytes(doc)?;
    match doc.format {
        DocumentFormat::Text => Ok(decode_text(&bytes)),
        DocumentFormat::Pdf => extract_pdf(&bytes, &doc.location()),
        DocumentFormat::Unsupported => Ok(String::new()),
    }
}

/// Extract text, degrading any failure to an empty string.
pub fn extract_text(doc: &Document) -> String {
    match extract_document(doc) {
        Ok(text) => text,
        Err(e) => {
            warn!("Extraction failed for document {}: {}", doc.id, e);
            String::new()
        }
    }
}

/// Extract text from a file on disk; the file name doubles as the id.
pub fn extract_path(path: &Path) -> String {
    let id = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    extract_text(&Document::from_path(id, path))
}

fn read_bytes(doc: &Document) -> Result<Cow<'_, [u8]>> {
    match &doc.source {
        DocumentSource::Path(path) => match std::fs::read(path) {
            Ok(bytes) => Ok(Cow::Owned(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(path.display().to_string()))
            }
            Err(e) => Err(Error::Io(e)),
        },
        DocumentSource::Memory { bytes, .. } => Ok(Cow::Borrowed(bytes.as_slice())),
    }
}

/// Decode UTF-8, dropping undecodable bytes.
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => text.chars().filter(|&c| c != char::REPLACEMENT_CHARACTER).collect(),
    }
}

/// Read each page's text layer; pages that fail are skipped.
fn extract_pdf(bytes: &[u8], location: &str) -> Result<String> {
    // lopdf can panic on malformed input; keep that inside the boundary.
    let parsed = panic::catch_unwind(AssertUnwindSafe(|| -> Result<String> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| Error::Extraction(format!("Failed to parse PDF {}: {}", location, e)))?;

        let mut pages = Vec::new();
        for page_number in document.get_pages().keys() {
            match document.extract_text(&[*page_number]) {
                Ok(text) => pages.push(text),
                Err(e) => debug!("Skipping page {} of {}: {}", page_number, location, e),
            }
        }
        Ok(pages.join("\n"))
    }));

    match parsed {
        Ok(result) => result,
        Err(_) => Err(Error::Extraction(format!("PDF parser panicked on {}", location))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// One page per entry, each drawing its text with Helvetica.
    fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(
            dictionary! { "Type" => "Font", "Subtype" => "Type1", "BaseFont" => "Helvetica" },
        );
        let resources_id =
            doc.add_object(dictionary! { "Font" => dictionary! { "F1" => font_id } });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages = dictionary! { "Type" => "Pages", "Kids" => kids, "Count" => count };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_pdf_pages_in_order() {
        let bytes = pdf_bytes(&["First page about rivers", "Second page about deltas"]);
        let doc = Document::from_bytes("1", "essay.pdf", bytes);

        let text = extract_document(&doc).unwrap();
        let first = text.find("First page about rivers").unwrap();
        let second = text.find("Second page about deltas").unwrap();
        assert!(first < second);
        assert!(text[first..second].contains('\n'));
    }

    #[test]
    fn test_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("essay.txt");
        std::fs::write(&path, "Hello world submission").unwrap();

        let doc = Document::from_path("1", &path);
        assert_eq!(extract_document(&doc).unwrap(), "Hello world submission");
        assert_eq!(extract_path(&path), "Hello world submission");
    }

    #[test]
    fn test_invalid_utf8_is_dropped() {
        let doc = Document::from_bytes("1", "a.txt", b"caf\xff\xfe text".to_vec());
        assert_eq!(extract_text(&doc), "caf text");
    }

    #[test]
    fn test_bom_is_stripped() {
        let doc = Document::from_bytes("1", "a.txt", b"\xEF\xBB\xBFHello".to_vec());
        assert_eq!(extract_text(&doc), "Hello");
    }

    #[test]
    fn test_unsupported_extension_is_empty() {
        let doc = Document::from_bytes("1", "essay.docx", b"PK\x03\x04 whatever".to_vec());
        assert_eq!(extract_document(&doc).unwrap(), "");
    }

    #[test]
    fn test_missing_file() {
        let doc = Document::from_path("1", "/no/such/dir/essay.txt");
        assert!(matches!(extract_document(&doc), Err(Error::NotFound(_))));
        assert_eq!(extract_text(&doc), "");
    }

    #[test]
    fn test_corrupt_pdf_degrades_to_empty() {
        let doc = Document::from_bytes("1", "essay.pdf", b"definitely not a pdf".to_vec());
        assert!(extract_document(&doc).is_err());
        assert_eq!(extract_text(&doc), "");
    }
}
