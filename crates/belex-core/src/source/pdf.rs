//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{Result, TextSource};
use crate::error::SourceError;

/// A loaded, text-extractable PDF document.
pub struct PdfDocument {
    raw_data: Vec<u8>,
    page_count: u32,
}

impl PdfDocument {
    /// Load a PDF from bytes.
    ///
    /// Documents encrypted with an empty user password are decrypted; any
    /// other encryption is rejected.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut doc = Document::load_mem(data).map_err(|e| SourceError::Parse(e.to_string()))?;

        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(SourceError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract reads the decrypted bytes, not the lopdf document
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| SourceError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len() as u32;
        if page_count == 0 {
            return Err(SourceError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(Self {
            raw_data,
            page_count,
        })
    }

    /// Get the number of pages in the PDF.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }
}

impl TextSource for PdfDocument {
    fn read_text(&self) -> Result<String> {
        let text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| SourceError::TextExtraction(e.to_string()))?;
        debug!("Extracted {} characters of text", text.len());
        Ok(text)
    }
}

/// Raw PDF bytes that are loaded lazily when text is requested.
///
/// Load failures surface through [`TextSource::read_text`], so a corrupt file
/// becomes a read failure of the extraction instead of a caller-side error.
impl TextSource for [u8] {
    fn read_text(&self) -> Result<String> {
        PdfDocument::from_bytes(self)?.read_text()
    }
}
