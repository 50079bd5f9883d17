//! Upload boundary: size and content-type limits checked before extraction.
//!
//! The content type is taken from the file's magic bytes when they are
//! recognizable, falling back to the file extension. A claimed type is never
//! trusted on its own.

use tracing::debug;

use crate::error::UploadError;
use crate::models::config::UploadConfig;

/// MIME type of PDF documents.
pub const PDF_MIME: &str = "application/pdf";

/// MIME type of already-decoded UTF-8 text.
pub const TEXT_MIME: &str = "text/plain";

/// Default upload size limit (10 MiB).
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

const OCTET_STREAM: &str = "application/octet-stream";

/// Limits a document must satisfy before it is decoded.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_size_bytes: u64,
    allowed_mime_types: Vec<String>,
}

impl UploadPolicy {
    /// Create a policy accepting PDFs up to 10 MiB.
    pub fn new() -> Self {
        Self::from_config(&UploadConfig::default())
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            max_size_bytes: config.max_size_bytes,
            allowed_mime_types: config.allowed_mime_types.clone(),
        }
    }

    /// Set the size limit.
    pub fn with_max_size(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    /// Accept an additional MIME type.
    pub fn allow(mut self, mime: impl Into<String>) -> Self {
        self.allowed_mime_types.push(mime.into());
        self
    }

    /// Check a file against the policy, returning its detected MIME type.
    pub fn check(&self, filename: &str, data: &[u8]) -> Result<&'static str, UploadError> {
        if data.is_empty() {
            return Err(UploadError::Empty);
        }

        let size = data.len() as u64;
        if size > self.max_size_bytes {
            return Err(UploadError::TooLarge {
                size,
                max: self.max_size_bytes,
            });
        }

        let mime = detect_content_type(filename, data);
        debug!("Detected content type {} for {}", mime, filename);

        if !self.allowed_mime_types.iter().any(|allowed| allowed == mime) {
            return Err(UploadError::UnsupportedType(mime.to_string()));
        }

        Ok(mime)
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the content type of a file from its magic bytes, then its extension.
pub fn detect_content_type(filename: &str, data: &[u8]) -> &'static str {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type();
    }

    // Formats with magic bytes must carry them; an extension alone does not count.
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" | "text" => TEXT_MIME,
        "csv" => "text/csv",
        _ => OCTET_STREAM,
    }
}
