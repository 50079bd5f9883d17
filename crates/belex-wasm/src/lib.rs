//! WASM bindings for invoice and delivery-note field extraction.
//!
//! Documents are decoded to text on the JavaScript side (e.g. with pdf.js);
//! these bindings run the field extraction on that text.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use belex_core::extract::rules::{normalize_date as normalize, parse_amount_to_cents as parse_cents};
use belex_core::format;
use belex_core::{DocumentExtractor, ExtractionResult};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract document fields from already-decoded text.
#[wasm_bindgen(js_name = extractFromText)]
pub fn extract_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&DocumentExtractor::new().extract_text(text))
}

/// Parse a German or international amount string into cents (0 when invalid).
#[wasm_bindgen(js_name = parseAmountToCents)]
pub fn parse_amount_to_cents(amount: &str) -> f64 {
    parse_cents(amount) as f64
}

/// Normalize `DD.MM.YYYY` / `YYYY-MM-DD` dates to `YYYY-MM-DD`.
#[wasm_bindgen(js_name = normalizeDate)]
pub fn normalize_date(date: &str) -> Option<String> {
    normalize(date)
}

/// Format cents as a German euro amount (`1.234,56 €`).
#[wasm_bindgen(js_name = formatCents)]
pub fn format_cents(cents: f64) -> String {
    format::format_cents(js_cents(cents))
}

/// Format cents for an input field (`1234,56`).
#[wasm_bindgen(js_name = centsToInputValue)]
pub fn cents_to_input_value(cents: f64) -> String {
    format::cents_to_input_value(js_cents(cents))
}

/// Format an ISO date as `DD.MM.YYYY`.
#[wasm_bindgen(js_name = formatDate)]
pub fn format_date(iso: &str) -> Option<String> {
    format::format_date(iso)
}

/// JS numbers are floats; negative and NaN inputs clamp to 0.
fn js_cents(cents: f64) -> u64 {
    if cents.is_finite() && cents > 0.0 {
        cents.round() as u64
    } else {
        0
    }
}

/// Extraction result together with the upload endpoint's answer for it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    result: ExtractionResult,
    outcome: &'static str,
    http_status: u16,
}

/// Document extractor class for browser use.
#[wasm_bindgen(js_name = DocumentExtractor)]
pub struct Extractor {
    inner: DocumentExtractor,
}

#[wasm_bindgen(js_class = DocumentExtractor)]
impl Extractor {
    /// Create a new document extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: DocumentExtractor::new(),
        }
    }

    /// Limit the number of line items (at most 30).
    #[wasm_bindgen(js_name = setMaxLineItems)]
    pub fn set_max_line_items(&mut self, max: usize) {
        self.inner = DocumentExtractor::new().with_max_line_items(max);
    }

    #[wasm_bindgen(getter, js_name = maxLineItems)]
    pub fn max_line_items(&self) -> usize {
        self.inner.max_line_items()
    }

    /// Extract fields from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.extract_text(text))
    }

    /// Extract fields and classify the result (`extracted`, `manualEntryRequired`, `unprocessable`).
    #[wasm_bindgen(js_name = extractWithStatus)]
    pub fn extract_with_status(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.inner.extract_text(text);
        let outcome = result.outcome();

        let report = StatusReport {
            outcome: match outcome {
                belex_core::ExtractionOutcome::Extracted => "extracted",
                belex_core::ExtractionOutcome::ManualEntryRequired => "manualEntryRequired",
                belex_core::ExtractionOutcome::Unprocessable => "unprocessable",
            },
            http_status: outcome.http_status(),
            result,
        };

        to_js(&report)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_extract_from_text() {
        let value = extract_from_text("Invoice no.: RE-2024-0099\nTotal amount: 1.234,56 EUR")
            .unwrap();
        let result: ExtractionResult = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(result.invoice_number.as_deref(), Some("RE-2024-0099"));
        assert_eq!(result.total_amount_cents, Some(123456));
    }

    #[wasm_bindgen_test]
    fn test_parse_amount_to_cents() {
        assert_eq!(parse_amount_to_cents("1.234,56"), 123456.0);
        assert_eq!(parse_amount_to_cents("abc"), 0.0);
    }

    #[wasm_bindgen_test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("4.3.2024").as_deref(), Some("2024-03-04"));
        assert_eq!(normalize_date("04.03.24"), None);
    }

    #[wasm_bindgen_test]
    fn test_format_cents() {
        assert_eq!(format_cents(123456.0), "1.234,56\u{a0}€");
        assert_eq!(format_cents(-5.0), "0,00\u{a0}€");
        assert_eq!(cents_to_input_value(4590.0), "45,90");
    }

    #[wasm_bindgen_test]
    fn test_extractor_class() {
        let mut extractor = Extractor::new();
        extractor.set_max_line_items(99);
        assert_eq!(extractor.max_line_items(), 30);

        let value = extractor.extract("").unwrap();
        let result: ExtractionResult = serde_wasm_bindgen::from_value(value).unwrap();
        assert!(result.error_kind.is_some());
    }
}
