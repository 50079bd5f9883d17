//! Document extractor combining the per-field rule extractors.

use tracing::{debug, info};

use crate::error::{Result, UploadError};
use crate::models::config::ExtractionConfig;
use crate::models::extraction::{ErrorKind, ExtractionResult};
use crate::source::{PlainTextSource, TextSource};
#[cfg(feature = "pdf")]
use crate::upload::PDF_MIME;
use crate::upload::{UploadPolicy, TEXT_MIME};

use super::rules::{
    DateExtractor, DocumentNumberExtractor, FieldExtractor, LineItemExtractor,
    TotalAmountExtractor,
};
use super::{DocumentParser, MAX_LINE_ITEMS};

/// Rule-based extractor for invoices and delivery notes.
///
/// Each field is extracted independently; a missing field never prevents
/// the others from being filled.
pub struct DocumentExtractor {
    /// Maximum number of line items kept.
    max_line_items: usize,
}

impl DocumentExtractor {
    /// Create a new extractor with default settings.
    pub fn new() -> Self {
        Self {
            max_line_items: MAX_LINE_ITEMS,
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_max_line_items(config.max_line_items)
    }

    /// Set the line item limit. Values above 30 are clamped.
    pub fn with_max_line_items(mut self, max: usize) -> Self {
        self.max_line_items = max.min(MAX_LINE_ITEMS);
        self
    }

    pub fn max_line_items(&self) -> usize {
        self.max_line_items
    }

    /// Extract all fields from decoded document text.
    pub fn extract_text(&self, text: &str) -> ExtractionResult {
        if text.trim().is_empty() {
            info!("Document has no extractable text, manual entry required");
            return ExtractionResult::failed(ErrorKind::NoExtractableText, text);
        }

        let date = DateExtractor::new().extract(text);
        let invoice_number = DocumentNumberExtractor::invoice_number().extract(text);
        let delivery_note_number = DocumentNumberExtractor::delivery_note().extract(text);
        let total = TotalAmountExtractor::new().extract(text);
        let line_items = LineItemExtractor::new()
            .with_max_items(self.max_line_items)
            .extract_all(text);

        if let Some(m) = &total {
            debug!("Total {} cents via {} ({:.2})", m.value, m.rule, m.confidence);
        }

        let result = ExtractionResult {
            date: date.map(|m| m.value),
            invoice_number: invoice_number.map(|m| m.value),
            delivery_note_number: delivery_note_number.map(|m| m.value),
            total_amount_cents: total.map(|m| m.value),
            line_items,
            raw_text: text.to_string(),
            error_kind: None,
        };

        info!(
            "Extracted document: {} line items, missing fields: {:?}",
            result.line_items.len(),
            result.missing_fields()
        );

        result
    }

    /// Decode a text source and extract all fields from it.
    pub fn extract_source<S: TextSource + ?Sized>(&self, source: &S) -> ExtractionResult {
        self.parse_source(source)
    }

    /// Check an uploaded file against `policy`, then extract from it.
    ///
    /// Rejected uploads are errors. A file that passes the policy but cannot
    /// be decoded still yields a result with [`ErrorKind::ReadFailure`].
    pub fn extract_upload(
        &self,
        policy: &UploadPolicy,
        filename: &str,
        data: &[u8],
    ) -> Result<ExtractionResult> {
        let mime = policy.check(filename, data)?;
        debug!("Accepted {} as {}", filename, mime);

        match mime {
            TEXT_MIME => Ok(self.extract_source(&PlainTextSource::new(data))),
            #[cfg(feature = "pdf")]
            PDF_MIME => Ok(self.extract_source(data)),
            other => Err(UploadError::UnsupportedType(other.to_string()).into()),
        }
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for DocumentExtractor {
    fn parse(&self, text: &str) -> ExtractionResult {
        self.extract_text(text)
    }
}
