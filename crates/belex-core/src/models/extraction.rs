//! Extraction output record handed to persistence and UI layers.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Why a document produced no fields at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Decoding succeeded but yielded no usable text (likely an image-only scan).
    NoExtractableText,
    /// The text source could not be decoded.
    ReadFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NoExtractableText => write!(f, "no extractable text"),
            ErrorKind::ReadFailure => write!(f, "document could not be read"),
        }
    }
}

/// One inferred row of a document's content listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Item description, at least four characters.
    pub description: String,

    /// Quantity as printed, e.g. "3 x" or "2,5 m²".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,

    /// Line amount in cents.
    pub amount_cents: u64,
}

/// Fields recovered from a single document.
///
/// Every field is independently optional. `error_kind` is only set when
/// extraction could not run at all, in which case every other field is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Document date as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_note_number: Option<String>,

    /// Grand total in cents, never zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount_cents: Option<u64>,

    #[serde(default)]
    pub line_items: Vec<LineItem>,

    /// Text the fields were extracted from.
    #[serde(default)]
    pub raw_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

/// Caller-facing classification of an extraction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Best-effort result; individual fields may be absent.
    Extracted,
    /// No text could be recovered; the user has to enter the data by hand.
    ManualEntryRequired,
    /// The document could not be read at all.
    Unprocessable,
}

impl ExtractionOutcome {
    /// HTTP status an upload endpoint answers with for this outcome.
    pub fn http_status(&self) -> u16 {
        match self {
            ExtractionOutcome::Extracted => 200,
            ExtractionOutcome::ManualEntryRequired | ExtractionOutcome::Unprocessable => 422,
        }
    }
}

impl ExtractionResult {
    /// Build a terminal result for a document extraction could not run on.
    pub fn failed(kind: ErrorKind, raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            error_kind: Some(kind),
            ..Self::default()
        }
    }

    /// True when no field was recovered and there are no line items.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.invoice_number.is_none()
            && self.delivery_note_number.is_none()
            && self.total_amount_cents.is_none()
            && self.line_items.is_empty()
    }

    pub fn outcome(&self) -> ExtractionOutcome {
        match self.error_kind {
            None => ExtractionOutcome::Extracted,
            Some(ErrorKind::NoExtractableText) => ExtractionOutcome::ManualEntryRequired,
            Some(ErrorKind::ReadFailure) => ExtractionOutcome::Unprocessable,
        }
    }

    /// The document date as a calendar date, if it names a real day.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    /// Names of the optional fields that could not be extracted.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push("date");
        }
        if self.invoice_number.is_none() {
            missing.push("invoiceNumber");
        }
        if self.delivery_note_number.is_none() {
            missing.push("deliveryNoteNumber");
        }
        if self.total_amount_cents.is_none() {
            missing.push("totalAmountCents");
        }
        if self.line_items.is_empty() {
            missing.push("lineItems");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serializes_to_output_contract() {
        let result = ExtractionResult {
            date: Some("2024-03-04".to_string()),
            invoice_number: Some("RE-2024-0099".to_string()),
            total_amount_cents: Some(123456),
            line_items: vec![LineItem {
                description: "Gypsum board".to_string(),
                quantity: None,
                amount_cents: 4590,
            }],
            raw_text: "text".to_string(),
            ..ExtractionResult::default()
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "date": "2024-03-04",
                "invoiceNumber": "RE-2024-0099",
                "totalAmountCents": 123456,
                "lineItems": [{ "description": "Gypsum board", "amountCents": 4590 }],
                "rawText": "text"
            })
        );
    }

    #[test]
    fn test_failed_result_serialization() {
        let result = ExtractionResult::failed(ErrorKind::NoExtractableText, "  ");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "lineItems": [],
                "rawText": "  ",
                "errorKind": "NoExtractableText"
            })
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_outcome_status_codes() {
        assert_eq!(ExtractionResult::default().outcome().http_status(), 200);
        assert_eq!(
            ExtractionResult::failed(ErrorKind::NoExtractableText, "").outcome(),
            ExtractionOutcome::ManualEntryRequired
        );
        assert_eq!(
            ExtractionResult::failed(ErrorKind::ReadFailure, "").outcome().http_status(),
            422
        );
    }

    #[test]
    fn test_calendar_date() {
        let mut result = ExtractionResult {
            date: Some("2024-02-29".to_string()),
            ..ExtractionResult::default()
        };
        assert_eq!(result.calendar_date(), NaiveDate::from_ymd_opt(2024, 2, 29));

        result.date = Some("2023-02-30".to_string());
        assert_eq!(result.calendar_date(), None);
    }

    #[test]
    fn test_missing_fields() {
        let result = ExtractionResult {
            invoice_number: Some("RE-1".to_string()),
            ..ExtractionResult::default()
        };
        assert_eq!(
            result.missing_fields(),
            vec!["date", "deliveryNoteNumber", "totalAmountCents", "lineItems"]
        );
    }
}
