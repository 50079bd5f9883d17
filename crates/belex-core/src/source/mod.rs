//! Text sources the extraction engine reads documents through.

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "pdf")]
pub use pdf::PdfDocument;

use crate::error::SourceError;

/// Result type for text source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// A document that can be decoded into a single text blob.
///
/// An `Err` means the document could not be decoded at all. Decoding that
/// succeeds with no usable text returns `Ok` with a blank string.
pub trait TextSource {
    fn read_text(&self) -> Result<String>;
}

impl TextSource for str {
    fn read_text(&self) -> Result<String> {
        Ok(self.to_string())
    }
}

impl TextSource for String {
    fn read_text(&self) -> Result<String> {
        Ok(self.clone())
    }
}

/// Raw bytes holding UTF-8 text, e.g. the contents of a `.txt` file.
#[derive(Debug, Clone)]
pub struct PlainTextSource {
    bytes: Vec<u8>,
}

impl PlainTextSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl TextSource for PlainTextSource {
    fn read_text(&self) -> Result<String> {
        let text = String::from_utf8(self.bytes.clone())?;
        // A leading byte-order mark is not document text.
        Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
    }
}
