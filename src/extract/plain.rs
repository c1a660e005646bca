//! Plain text extractor.

use super::{TextExtractor, MIME_TEXT};
use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Decodes UTF-8 text, with or without BOM, and BOM-marked UTF-16.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor {
    _private: (),
}

impl PlainTextExtractor {
    /// Create a new plain text extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &str {
        "plain-text"
    }

    fn mime_types(&self) -> &[&str] {
        &[MIME_TEXT, "text/markdown"]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
            return decode_utf16(rest, u16::from_le_bytes);
        }
        if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
            return decode_utf16(rest, u16::from_be_bytes);
        }

        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        if body.contains(&0) {
            return Err(Error::CorruptFile("NUL byte in plain text".to_string()));
        }
        std::str::from_utf8(body)
            .map(str::to_string)
            .map_err(|e| {
                Error::CorruptFile(format!("invalid UTF-8 at byte {}", e.valid_up_to()))
            })
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::CorruptFile("odd length UTF-16 text".to_string()));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| Error::CorruptFile(format!("invalid UTF-16: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_with_and_without_bom() {
        let extractor = PlainTextExtractor::new();
        assert_eq!(extractor.extract("Résumé".as_bytes()).unwrap(), "Résumé");
        assert_eq!(extractor.extract(b"\xEF\xBB\xBFJane").unwrap(), "Jane");
    }

    #[test]
    fn test_utf16() {
        let extractor = PlainTextExtractor::new();
        let le: Vec<u8> = [0xFF, 0xFE]
            .into_iter()
            .chain("Jane".encode_utf16().flat_map(|u| u.to_le_bytes()))
            .collect();
        assert_eq!(extractor.extract(&le).unwrap(), "Jane");

        let be: Vec<u8> = [0xFE, 0xFF]
            .into_iter()
            .chain("Doe".encode_utf16().flat_map(|u| u.to_be_bytes()))
            .collect();
        assert_eq!(extractor.extract(&be).unwrap(), "Doe");

        assert!(extractor.extract(&[0xFF, 0xFE, 0x41]).is_err());
    }

    #[test]
    fn test_corrupt_input() {
        let extractor = PlainTextExtractor::new();
        let err = extractor.extract(b"ok\xC3\x28").unwrap_err();
        assert_eq!(err.kind(), "corrupt-file");
        assert!(extractor.extract(b"a\x00b").is_err());
    }

    #[test]
    fn test_supports() {
        let extractor = PlainTextExtractor::new();
        assert!(extractor.supports("text/plain; charset=utf-8"));
        assert!(!extractor.supports("application/pdf"));
    }
}
