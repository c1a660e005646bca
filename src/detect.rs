//! Source format detection.
//!
//! Resumes arrive as PDF, Word (DOCX or legacy DOC) or plain text. The
//! format is sniffed from magic bytes first and from the file extension
//! when the bytes are inconclusive.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// MIME type of PDF sources.
pub const MIME_PDF: &str = "application/pdf";
/// MIME type of DOCX sources.
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type of legacy Word sources.
pub const MIME_DOC: &str = "application/msword";
/// MIME type of plain text sources.
pub const MIME_TEXT: &str = "text/plain";

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const VERSION_LEN: usize = 3;

/// Bytes read from a file for sniffing.
const SNIFF_LEN: usize = 4096;

/// Format of a resume source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Docx,
    Doc,
    Text,
    Unknown,
}

impl SourceFormat {
    /// MIME type used to pick an extractor.
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            SourceFormat::Pdf => Some(MIME_PDF),
            SourceFormat::Docx => Some(MIME_DOCX),
            SourceFormat::Doc => Some(MIME_DOC),
            SourceFormat::Text => Some(MIME_TEXT),
            SourceFormat::Unknown => None,
        }
    }

    /// Usual file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Pdf => "pdf",
            SourceFormat::Docx => "docx",
            SourceFormat::Doc => "doc",
            SourceFormat::Text => "txt",
            SourceFormat::Unknown => "",
        }
    }

    /// Format for a file extension, case-insensitive, leading dot optional.
    pub fn from_extension(ext: &str) -> SourceFormat {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => SourceFormat::Pdf,
            "docx" => SourceFormat::Docx,
            "doc" => SourceFormat::Doc,
            "txt" | "text" | "md" | "markdown" => SourceFormat::Text,
            _ => SourceFormat::Unknown,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SourceFormat::Pdf => "PDF",
            SourceFormat::Docx => "DOCX",
            SourceFormat::Doc => "DOC",
            SourceFormat::Text => "plain text",
            SourceFormat::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Detect the format of a file, reading at most its first 4 KiB.
///
/// Falls back to the extension when the content is inconclusive.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let path = path.as_ref();
    let mut header = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut header)?;

    let format = match detect_format_from_bytes(&header) {
        SourceFormat::Unknown => detect_format_from_extension(path),
        format => format,
    };
    log::debug!("{} detected as {}", path.display(), format);
    Ok(format)
}

/// Detect the format from leading bytes.
pub fn detect_format_from_bytes(data: &[u8]) -> SourceFormat {
    if data.starts_with(PDF_MAGIC) {
        return SourceFormat::Pdf;
    }
    if data.starts_with(OLE_MAGIC) {
        return SourceFormat::Doc;
    }
    if data.starts_with(ZIP_MAGIC) {
        return if contains(data, b"word/") || contains(data, b"[Content_Types].xml") {
            SourceFormat::Docx
        } else {
            SourceFormat::Unknown
        };
    }
    if looks_like_text(data) {
        return SourceFormat::Text;
    }
    SourceFormat::Unknown
}

/// Detect the format from a path's extension.
pub fn detect_format_from_extension<P: AsRef<Path>>(path: P) -> SourceFormat {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(SourceFormat::from_extension)
        .unwrap_or(SourceFormat::Unknown)
}

/// PDF version from the header (e.g. "1.7"), if the data is a PDF.
pub fn pdf_version(data: &[u8]) -> Option<String> {
    let bytes = data.get(PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN)?;
    if !data.starts_with(PDF_MAGIC) {
        return None;
    }
    let version = String::from_utf8_lossy(bytes).to_string();
    is_valid_version(&version).then_some(version)
}

/// Check if bytes start like a PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data) == SourceFormat::Pdf
}

fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn looks_like_text(data: &[u8]) -> bool {
    if data.is_empty() {
        return false;
    }
    if data.starts_with(&[0xFF, 0xFE]) || data.starts_with(&[0xFE, 0xFF]) {
        return true;
    }
    if data.contains(&0) {
        return false;
    }
    match std::str::from_utf8(data) {
        Ok(_) => true,
        // A multi-byte character cut off by the sniff window
        Err(e) => e.error_len().is_none() && e.valid_up_to() + 4 > data.len(),
    }
}
