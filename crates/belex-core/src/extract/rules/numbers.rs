//! Invoice-number and delivery-note-number extraction.
//!
//! Both fields are a label followed by a 4-31 character token; they differ
//! only in the label vocabulary, so one extractor runs either rule table.

use lazy_static::lazy_static;

use super::patterns::{
    DELIVERY_NOTE_LABELED, DELIVERY_NOTE_PHRASE, INVOICE_NUMBER_LABELED, INVOICE_NUMBER_PHRASE,
};
use super::{ExtractionMatch, FieldExtractor, Rule, RuleChain};

lazy_static! {
    static ref INVOICE_NUMBER_RULES: RuleChain = RuleChain::new(vec![
        Rule::new("invoice-number-label", &INVOICE_NUMBER_LABELED, 0.95),
        Rule::new("invoice-number-phrase", &INVOICE_NUMBER_PHRASE, 0.9),
    ]);

    static ref DELIVERY_NOTE_RULES: RuleChain = RuleChain::new(vec![
        Rule::new("delivery-note-label", &DELIVERY_NOTE_LABELED, 0.95),
        Rule::new("delivery-note-phrase", &DELIVERY_NOTE_PHRASE, 0.9),
    ]);
}

/// Label-anchored document number extractor.
pub struct DocumentNumberExtractor {
    rules: &'static RuleChain,
}

impl DocumentNumberExtractor {
    /// Extractor for invoice numbers ("Rechnungsnummer", "Invoice no.", ...).
    pub fn invoice_number() -> Self {
        Self {
            rules: &INVOICE_NUMBER_RULES,
        }
    }

    /// Extractor for delivery-note numbers ("Lieferschein-Nr.", "Delivery note", ...).
    pub fn delivery_note() -> Self {
        Self {
            rules: &DELIVERY_NOTE_RULES,
        }
    }
}

impl FieldExtractor for DocumentNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.rules.first_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn invoice(text: &str) -> Option<String> {
        DocumentNumberExtractor::invoice_number()
            .extract(text)
            .map(|m| m.value)
    }

    fn delivery(text: &str) -> Option<String> {
        DocumentNumberExtractor::delivery_note()
            .extract(text)
            .map(|m| m.value)
    }

    #[test]
    fn test_invoice_number_labels() {
        assert_eq!(invoice("Invoice no.: RE-2024-0099"), Some("RE-2024-0099".to_string()));
        assert_eq!(invoice("Rechnungsnummer: 2024/0815"), Some("2024/0815".to_string()));
        assert_eq!(invoice("Rechnungs-Nr. R_4711"), Some("R_4711".to_string()));
        assert_eq!(invoice("Rg.-Nr.: 100234"), Some("100234".to_string()));
        assert_eq!(invoice("Invoice Number INV.2024.17"), Some("INV.2024.17".to_string()));
    }

    #[test]
    fn test_invoice_number_phrase() {
        assert_eq!(invoice("Rechnung Nr. 55012"), Some("55012".to_string()));
        assert_eq!(invoice("Rechnung Nummer: A-9981"), Some("A-9981".to_string()));
    }

    #[test]
    fn test_invoice_number_too_short() {
        assert_eq!(invoice("Rechnungsnummer: 12"), None);
    }

    #[test]
    fn test_invoice_number_ignores_date_label() {
        let text = "Invoice date: 04.03.2024\nInvoice no.: RE-2024-0099";
        assert_eq!(invoice(text), Some("RE-2024-0099".to_string()));
    }

    #[test]
    fn test_delivery_note_labels() {
        assert_eq!(delivery("Lieferschein-Nr.: LS-77810"), Some("LS-77810".to_string()));
        assert_eq!(delivery("Lieferscheinnummer 900123"), Some("900123".to_string()));
        assert_eq!(delivery("LS-Nr. 4471-B"), Some("4471-B".to_string()));
        assert_eq!(delivery("Delivery note no.: DN-2024-7"), Some("DN-2024-7".to_string()));
        assert_eq!(delivery("Delivery Note 12345"), Some("12345".to_string()));
    }

    #[test]
    fn test_delivery_note_phrase() {
        assert_eq!(delivery("Lieferschein Nr: 70011"), Some("70011".to_string()));
    }

    #[test]
    fn test_fields_are_independent() {
        let text = "Rechnungsnummer: RE-1001\nLieferschein-Nr.: LS-2002";
        assert_eq!(invoice(text), Some("RE-1001".to_string()));
        assert_eq!(delivery(text), Some("LS-2002".to_string()));
        assert_eq!(delivery("Rechnungsnummer: RE-1001"), None);
    }
}
