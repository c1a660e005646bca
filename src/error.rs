//! Error types for resumekit library.

use std::io;
use thiserror::Error;

/// Result type alias for resumekit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur around the structuring pipeline.
///
/// The pipeline stages themselves (normalize, segment, assemble, rewrite,
/// render) are total and never produce these. Errors come from the
/// collaborators at the boundary (text extraction, remote rewriting) and
/// from direct, index-based edits of a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No extractor is available for the declared or detected format.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The source bytes are damaged or do not match their declared format.
    #[error("Corrupt file: {0}")]
    CorruptFile(String),

    /// The extractor failed while reading a well-formed file.
    #[error("Text extraction error: {0}")]
    Extraction(String),

    /// The remote rewrite tier answered with a non-2xx status.
    #[error("Remote rewrite returned status {0}")]
    RemoteStatus(u16),

    /// The remote rewrite tier did not answer in time.
    #[error("Remote rewrite timed out")]
    RemoteTimeout,

    /// Transport-level failure talking to the remote rewrite tier.
    #[error("Remote rewrite error: {0}")]
    Remote(String),

    /// The remote rewrite tier answered with a body that breaks its contract.
    #[error("Invalid remote response: {0}")]
    InvalidResponse(String),

    /// Index out of range on a direct entity mutation.
    #[error("Index {index} is out of range for {section} (length {len})")]
    IndexOutOfRange {
        /// Collection being edited
        section: &'static str,
        /// Requested index
        index: usize,
        /// Current collection length
        len: usize,
    },

    /// Error during rendering (text, Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// A configuration value is invalid.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Stable wire name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(_) => "io-error",
            Error::UnsupportedFormat(_) => "unsupported-format",
            Error::CorruptFile(_) => "corrupt-file",
            Error::Extraction(_) => "extraction-error",
            Error::RemoteStatus(_) => "remote-status",
            Error::RemoteTimeout => "remote-timeout",
            Error::Remote(_) => "remote-error",
            Error::InvalidResponse(_) => "invalid-response",
            Error::IndexOutOfRange { .. } => "index-out-of-range",
            Error::Render(_) => "render-error",
            Error::InvalidOption(_) => "invalid-option",
            Error::Other(_) => "other",
        }
    }

    /// Whether the caller is expected to fall back instead of failing.
    ///
    /// Remote rewrite failures degrade to the local rule engine.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::RemoteStatus(_)
                | Error::RemoteTimeout
                | Error::Remote(_)
                | Error::InvalidResponse(_)
        )
    }

    /// Whether this error came from the text extraction collaborator.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFormat(_) | Error::CorruptFile(_) | Error::Extraction(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::RemoteTimeout;
        assert_eq!(err.to_string(), "Remote rewrite timed out");

        let err = Error::IndexOutOfRange {
            section: "experience",
            index: 4,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "Index 4 is out of range for experience (length 2)"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::UnsupportedFormat("application/zip".into()).kind(),
            "unsupported-format"
        );
        assert_eq!(Error::CorruptFile("bad".into()).kind(), "corrupt-file");
        assert_eq!(Error::Extraction("x".into()).kind(), "extraction-error");
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::RemoteStatus(503).is_recoverable());
        assert!(Error::RemoteTimeout.is_recoverable());
        assert!(!Error::CorruptFile("x".into()).is_recoverable());
        assert!(Error::CorruptFile("x".into()).is_extraction_failure());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
