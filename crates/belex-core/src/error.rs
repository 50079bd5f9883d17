//! Error types for the belex-core library.

use thiserror::Error;

/// Main error type for the belex library.
#[derive(Error, Debug)]
pub enum BelexError {
    /// The upload was rejected before extraction.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while decoding a document into text.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to open/parse the document.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// Failed to extract text from the document.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The bytes are not valid UTF-8 text.
    #[error("invalid UTF-8 text: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

/// Errors raised by the upload boundary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UploadError {
    /// No file content was supplied.
    #[error("no file given")]
    Empty,

    /// The file exceeds the configured size limit.
    #[error("file too large ({size} bytes, max. {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    /// The detected content type is not accepted.
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),
}

/// Result type for the belex library.
pub type Result<T> = std::result::Result<T, BelexError>;
