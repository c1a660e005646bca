//! Integration tests for text extraction and format detection.

use std::io::Write;
use std::sync::Arc;

use resumekit::detect::{MIME_DOCX, MIME_PDF, MIME_TEXT};
use resumekit::{
    detect_format_from_bytes, Error, ExtractorRegistry, ResumeKit, Result, SourceFormat,
    TextExtractor,
};

/// Stand-in for a binary-format extractor.
struct MockPdf {
    text: Option<&'static str>,
}

impl TextExtractor for MockPdf {
    fn name(&self) -> &str {
        "mock-pdf"
    }

    fn mime_types(&self) -> &[&str] {
        &[MIME_PDF]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        if !bytes.starts_with(b"%PDF-") {
            return Err(Error::CorruptFile("missing PDF header".into()));
        }
        self.text
            .map(str::to_string)
            .ok_or_else(|| Error::Extraction("no text layer".into()))
    }
}

const PDF_TEXT: &str = "Jane Doe\njane@example.com\n\nSKILLS\nRust, Go";

#[test]
fn test_registry_dispatch() {
    let mut registry = ExtractorRegistry::with_defaults();
    registry.register(Arc::new(MockPdf {
        text: Some(PDF_TEXT),
    }));

    assert!(registry.supports(MIME_PDF));
    assert!(registry.supports("Text/Plain; charset=utf-8"));
    assert!(!registry.supports(MIME_DOCX));
    assert!(registry.get_by_name("mock-pdf").is_some());

    let text = registry.extract(b"%PDF-1.7 ...", MIME_PDF).unwrap();
    assert_eq!(text, PDF_TEXT);
    assert_eq!(registry.extract(b"plain", MIME_TEXT).unwrap(), "plain");
}

#[test]
fn test_failures_are_typed() {
    let mut registry = ExtractorRegistry::new();
    registry.register(Arc::new(MockPdf { text: None }));

    let err = registry.extract(b"not a pdf", MIME_PDF).unwrap_err();
    assert_eq!(err.kind(), "corrupt-file");
    assert!(err.is_extraction_failure());

    let err = registry.extract(b"%PDF-1.4", MIME_PDF).unwrap_err();
    assert_eq!(err.kind(), "extraction-error");

    let err = registry.extract(b"PK\x03\x04", MIME_DOCX).unwrap_err();
    assert_eq!(err.kind(), "unsupported-format");
}

#[test]
fn test_kit_uses_registered_extractor() {
    let kit = ResumeKit::new().with_extractor(Arc::new(MockPdf {
        text: Some(PDF_TEXT),
    }));

    let result = kit.parse_bytes(b"%PDF-1.7\n", MIME_PDF).unwrap();
    assert_eq!(result.document.contact().name, "Jane Doe");
    assert_eq!(result.document.skills()[0].skills, vec!["Rust", "Go"]);

    let err = ResumeKit::new().parse_bytes(b"%PDF-1.7\n", MIME_PDF).unwrap_err();
    assert_eq!(err.kind(), "unsupported-format");
}

#[test]
fn test_parse_text_file() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(PDF_TEXT.as_bytes()).unwrap();
    file.flush().unwrap();

    let doc = resumekit::parse_file(file.path()).unwrap();
    assert_eq!(doc.contact().email.as_deref(), Some("jane@example.com"));

    let result = ResumeKit::new().parse_file(file.path()).unwrap();
    assert_eq!(result.document, doc);
}

#[test]
fn test_parse_missing_file() {
    let err = resumekit::parse_file("/nonexistent/resume.txt").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_detect_sources() {
    assert_eq!(detect_format_from_bytes(b"%PDF-1.7"), SourceFormat::Pdf);
    assert_eq!(
        detect_format_from_bytes(b"PK\x03\x04....word/document.xml"),
        SourceFormat::Docx
    );
    assert_eq!(detect_format_from_bytes(PDF_TEXT.as_bytes()), SourceFormat::Text);
    assert_eq!(SourceFormat::Pdf.mime_type(), Some(MIME_PDF));
}
