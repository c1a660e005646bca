//! Text extraction collaborators.
//!
//! Extracting text from binary formats is done by collaborators that
//! implement [`TextExtractor`]. An [`ExtractorRegistry`] dispatches on the
//! declared MIME type. Only plain text is handled in-crate; PDF and Word
//! extractors are registered by the caller.
//!
//! # Example
//!
//! ```
//! use resumekit::extract::{ExtractorRegistry, MIME_TEXT};
//!
//! let registry = ExtractorRegistry::with_defaults();
//! let text = registry.extract(b"Jane Doe\nEXPERIENCE", MIME_TEXT).unwrap();
//! assert!(text.starts_with("Jane Doe"));
//! ```

mod plain;

pub use crate::detect::{MIME_DOC, MIME_DOCX, MIME_PDF, MIME_TEXT};
pub use plain::PlainTextExtractor;

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A collaborator that turns source bytes into plain text.
///
/// Failures are reported as [`Error::UnsupportedFormat`],
/// [`Error::CorruptFile`] or [`Error::Extraction`].
pub trait TextExtractor: Send + Sync {
    /// Get the name of this extractor.
    fn name(&self) -> &str;

    /// MIME types this extractor accepts, lowercase.
    fn mime_types(&self) -> &[&str];

    /// Extract text from bytes.
    fn extract(&self, bytes: &[u8]) -> Result<String>;

    /// Check if this extractor accepts the given MIME type.
    fn supports(&self, mime: &str) -> bool {
        let mime = normalize_mime(mime);
        self.mime_types().iter().any(|m| *m == mime)
    }
}

/// Lowercase a MIME type and drop its parameters (`; charset=...`).
pub fn normalize_mime(mime: &str) -> String {
    mime.split(';').next().unwrap_or("").trim().to_lowercase()
}

/// Registry of text extractors keyed by MIME type.
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn TextExtractor>>,
    by_name: HashMap<String, Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the plain text extractor.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PlainTextExtractor::new()));
        registry
    }

    /// Register an extractor for all its MIME types.
    ///
    /// A later registration for the same MIME type replaces the earlier one.
    pub fn register(&mut self, extractor: Arc<dyn TextExtractor>) {
        for mime in extractor.mime_types() {
            self.extractors
                .insert(normalize_mime(mime), extractor.clone());
        }
        self.by_name
            .insert(extractor.name().to_lowercase(), extractor);
    }

    /// Get an extractor by MIME type.
    pub fn get(&self, mime: &str) -> Option<Arc<dyn TextExtractor>> {
        self.extractors.get(&normalize_mime(mime)).cloned()
    }

    /// Get an extractor by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn TextExtractor>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if a MIME type is supported.
    pub fn supports(&self, mime: &str) -> bool {
        self.extractors.contains_key(&normalize_mime(mime))
    }

    /// All supported MIME types, sorted.
    pub fn supported_mime_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.extractors.keys().map(|s| s.as_str()).collect();
        types.sort_unstable();
        types
    }

    /// Extract text from bytes of the declared MIME type.
    pub fn extract(&self, bytes: &[u8], mime: &str) -> Result<String> {
        let extractor = self
            .get(mime)
            .ok_or_else(|| Error::UnsupportedFormat(normalize_mime(mime)))?;

        log::debug!(
            "extracting {} bytes of {} with {}",
            bytes.len(),
            normalize_mime(mime),
            extractor.name()
        );
        extractor.extract(bytes)
    }

    /// Read a file, detect its format and extract its text.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = path.as_ref();
        let format = detect_format_from_path(path)?;
        let mime = format
            .mime_type()
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
        let bytes = std::fs::read(path)?;
        self.extract(&bytes, mime)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl TextExtractor for Failing {
        fn name(&self) -> &str {
            "failing-pdf"
        }

        fn mime_types(&self) -> &[&str] {
            &[MIME_PDF]
        }

        fn extract(&self, _bytes: &[u8]) -> Result<String> {
            Err(Error::CorruptFile("truncated xref table".into()))
        }
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(registry.supports("text/plain"));
        assert!(registry.supports("TEXT/PLAIN; charset=utf-8"));
        assert!(!registry.supports(MIME_PDF));
        assert!(registry.get_by_name("plain-text").is_some());
    }

    #[test]
    fn test_unregistered_mime_is_unsupported() {
        let registry = ExtractorRegistry::with_defaults();
        let err = registry.extract(b"%PDF-1.7", MIME_PDF).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref m) if m == MIME_PDF));
        assert_eq!(err.kind(), "unsupported-format");
    }

    #[test]
    fn test_registered_extractor_failure_propagates() {
        let mut registry = ExtractorRegistry::with_defaults();
        registry.register(Arc::new(Failing));

        let err = registry.extract(b"%PDF-1.7", "application/pdf").unwrap_err();
        assert_eq!(err.kind(), "corrupt-file");
        assert!(err.is_extraction_failure());
        assert_eq!(
            registry.supported_mime_types().first().copied(),
            Some(MIME_PDF)
        );
    }

    #[test]
    fn test_normalize_mime() {
        assert_eq!(normalize_mime(" Text/Plain ; charset=UTF-8"), "text/plain");
    }
}
