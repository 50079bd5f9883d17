//! Common regex patterns for invoice and delivery-note extraction.
//!
//! Label vocabularies cover the German documents the engine was built for
//! plus their English equivalents.

use lazy_static::lazy_static;
use regex::Regex;

/// Monetary token with exactly two decimals, optionally dot-grouped (`1.234,56`).
const AMOUNT: &str = r"(?:\d{1,3}(?:\.\d{3})+|\d{1,6})[.,]\d{2}";

/// Day-month-year token with a 2- or 4-digit year.
const DATE: &str = r"\d{1,2}[./\-]\d{1,2}[./\-]\d{2,4}";

/// Document number token following a label.
const DOC_NUMBER: &str = r"[A-Z0-9][A-Z0-9\-/_.]{3,30}";

/// Quantity units recognized in line items.
const UNIT: &str = r"(?i:St(?:ü|ue)ck|Stk\.?|St\.?|pieces?|pcs\.?|pc\.?|m²|m2|lfm|kg|Pck\.?|Pkg\.?|packs?|Rollen?|rolls?|m|l)";

lazy_static! {
    // Amount normalization (matched against whitespace-free input)
    pub static ref AMOUNT_GERMAN_GROUPED: Regex = Regex::new(
        r"^\d{1,3}(?:\.\d{3})*,\d{2}$"
    ).unwrap();

    pub static ref AMOUNT_GERMAN_SIMPLE: Regex = Regex::new(
        r"^\d+,\d{2}$"
    ).unwrap();

    pub static ref AMOUNT_DECIMAL_POINT: Regex = Regex::new(
        r"^\d+\.\d{2}$"
    ).unwrap();

    pub static ref NUMERIC_PREFIX: Regex = Regex::new(
        r"^-?(?:\d+(?:\.\d+)?|\.\d+)"
    ).unwrap();

    // Dates
    pub static ref DATE_LABELED: Regex = Regex::new(&format!(
        r"(?i)(?:Rechnungsdatum|Leistungsdatum|Belegdatum|Bestelldatum|Datum|Invoice\s+date|Service\s+date|Document\s+date|Order\s+date|Date)\s*[:\-]?\s*({DATE})"
    )).unwrap();

    pub static ref DATE_DATED: Regex = Regex::new(&format!(
        r"(?i)\b(?:vom|dated)\s+({DATE})"
    )).unwrap();

    pub static ref DATE_LABEL_STRICT: Regex = Regex::new(
        r"(?i)(?:Datum|Date)\s*:\s*(\d{1,2}\.\d{1,2}\.\d{4})"
    ).unwrap();

    pub static ref DATE_FALLBACK: Regex = Regex::new(
        r"\b(\d{1,2}[./\-]\d{1,2}[./\-]20\d{2})\b"
    ).unwrap();

    pub static ref DATE_ANY: Regex = Regex::new(&format!(
        r"\b({DATE})\b"
    )).unwrap();

    // Invoice numbers
    pub static ref INVOICE_NUMBER_LABELED: Regex = Regex::new(&format!(
        r"(?i)(?:Rechnungsnummer|Rechnungs-?Nr\.?|Rg\.?-?Nr\.?|Re\.?-?Nr\.?|Belegnummer|Invoice\s*(?:Number|No\.?|#)|Inv\.?-?No\.?)\s*[:\-]?\s*({DOC_NUMBER})"
    )).unwrap();

    pub static ref INVOICE_NUMBER_PHRASE: Regex = Regex::new(&format!(
        r"(?i)Rechnung\s+(?:Nr\.?|Nummer)\s*[:\-]?\s*({DOC_NUMBER})"
    )).unwrap();

    // Delivery-note numbers
    pub static ref DELIVERY_NOTE_LABELED: Regex = Regex::new(&format!(
        r"(?i)(?:Lieferschein-?(?:Nr\.?|Nummer)|LS-?Nr\.?|Delivery\s*Note\s*(?:Number|No\.?)?)\s*[:\-]?\s*({DOC_NUMBER})"
    )).unwrap();

    pub static ref DELIVERY_NOTE_PHRASE: Regex = Regex::new(&format!(
        r"(?i)Lieferschein\s+Nr\.?:?\s*({DOC_NUMBER})"
    )).unwrap();

    // Totals
    pub static ref TOTAL_LABELED: Regex = Regex::new(
        r"(?i)(?:Gesamtbetrag|Rechnungsbetrag|Rechnungssumme|Bruttobetrag|Gesamt\s+inkl\.?\s*(?:MwSt|USt)|Zu\s+zahlen|Zahlbetrag|Summe\s+brutto|Total\s+amount|Invoice\s+amount|Invoice\s+total|Gross\s+amount|Total\s+incl\.?\s*VAT|Amount\s+due|Total\s+gross|\bTotal)\s*[:\-]?\s*(?:EUR|€)?\s*([\d.,]+)"
    ).unwrap();

    pub static ref TOTAL_REVERSED: Regex = Regex::new(
        r"(?i)(?:EUR|€)\s*([\d.,]+)\s*(?:inkl\.?\s*(?:MwSt|USt)|incl\.?\s*VAT|brutto|gross)"
    ).unwrap();

    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(&format!(
        r"(?i)(?:€|EUR)\s*({AMOUNT})"
    )).unwrap();

    pub static ref CURRENCY_MARKER: Regex = Regex::new(
        r"(?i)€|EUR"
    ).unwrap();

    pub static ref LINE_AMOUNT: Regex = Regex::new(&format!(
        r"\b({AMOUNT})\b"
    )).unwrap();

    // Line items
    pub static ref LINE_ITEM: Regex = Regex::new(&format!(
        r"^(.{{5,60}}?)\s+(?:(\d+(?:[.,]\d+)?\s*(?:[xX×]\s*{UNIT}?|{UNIT}))\s+)?({AMOUNT})\s*(?:€|EUR)?$"
    )).unwrap();

    pub static ref SUMMARY_LINE: Regex = Regex::new(
        r"(?i)gesamt|summe|mwst|steuer|netto|brutto|zahlung|total|tax|payment|\bust\b|\bsums?\b|\bvat\b|\bnet\b|\bgross\b"
    ).unwrap();
}
