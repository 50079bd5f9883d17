//! Core library for invoice and delivery-note field extraction.
//!
//! This crate provides:
//! - A rule-based extraction engine that recovers the document date, invoice
//!   number, delivery-note number, total amount and line items from plain text
//! - Text sources (already-decoded text, UTF-8 files, text-based PDFs)
//! - The upload boundary (size and content-type limits) applied before extraction
//! - Configuration and display formatting helpers

pub mod error;
pub mod extract;
pub mod format;
pub mod models;
pub mod source;
pub mod upload;

pub use error::{BelexError, Result, SourceError, UploadError};
pub use extract::{DocumentExtractor, DocumentParser};
pub use models::extraction::{ErrorKind, ExtractionOutcome, ExtractionResult, LineItem};
pub use models::config::BelexConfig;
pub use source::{PlainTextSource, TextSource};
#[cfg(feature = "pdf")]
pub use source::PdfDocument;
pub use upload::UploadPolicy;
