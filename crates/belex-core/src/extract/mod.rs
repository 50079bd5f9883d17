//! Document field extraction module.

mod document;
pub mod rules;

pub use document::DocumentExtractor;
pub use rules::line_items::{MAX_ITEM_AMOUNT_CENTS, MAX_LINE_ITEMS};

use tracing::warn;

use crate::models::extraction::{ErrorKind, ExtractionResult};
use crate::source::TextSource;

/// Trait for document parsers.
///
/// Parsing never fails: unreadable or empty documents come back as an
/// [`ExtractionResult`] carrying an [`ErrorKind`].
pub trait DocumentParser {
    /// Extract fields from already-decoded text.
    fn parse(&self, text: &str) -> ExtractionResult;

    /// Decode a text source, then extract fields from it.
    fn parse_source<S>(&self, source: &S) -> ExtractionResult
    where
        S: TextSource + ?Sized,
        Self: Sized,
    {
        match source.read_text() {
            Ok(text) => self.parse(&text),
            Err(e) => {
                warn!("Failed to read document text: {}", e);
                ExtractionResult::failed(ErrorKind::ReadFailure, "")
            }
        }
    }
}
