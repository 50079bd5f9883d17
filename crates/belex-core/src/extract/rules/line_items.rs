//! Line-item segmentation.
//!
//! A line item is a single text line shaped like
//! `<description> [<quantity>] <amount> [€|EUR]`. Summary lines (totals,
//! taxes, payment terms) share that shape and are filtered out up front.

use tracing::trace;

use super::amounts::parse_amount_to_cents;
use super::patterns::{LINE_ITEM, SUMMARY_LINE};
use super::FieldExtractor;
use crate::models::extraction::LineItem;

/// Hard cap on line items per document.
pub const MAX_LINE_ITEMS: usize = 30;

/// Line amounts at or above this many cents are treated as mis-matches.
pub const MAX_ITEM_AMOUNT_CENTS: u64 = 10_000_000;

const MIN_LINE_CHARS: usize = 10;
const MIN_DESCRIPTION_CHARS: usize = 4;

/// Parse a single trimmed text line as a line item.
pub fn parse_line_item(line: &str) -> Option<LineItem> {
    if line.chars().count() < MIN_LINE_CHARS
        || line.starts_with('%')
        || SUMMARY_LINE.is_match(line)
    {
        return None;
    }

    let caps = LINE_ITEM.captures(line)?;

    let description = caps[1].trim();
    let quantity = caps
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|q| !q.is_empty())
        .map(str::to_string);
    let amount_cents = parse_amount_to_cents(&caps[3]);

    if description.chars().count() < MIN_DESCRIPTION_CHARS
        || amount_cents == 0
        || amount_cents >= MAX_ITEM_AMOUNT_CENTS
    {
        trace!("Rejected line item candidate {:?}", line);
        return None;
    }

    Some(LineItem {
        description: description.to_string(),
        quantity,
        amount_cents,
    })
}

/// Line-item extractor.
pub struct LineItemExtractor {
    max_items: usize,
}

impl LineItemExtractor {
    pub fn new() -> Self {
        Self {
            max_items: MAX_LINE_ITEMS,
        }
    }

    /// Limit the number of items returned; never exceeds the hard cap.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items.min(MAX_LINE_ITEMS);
        self
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LineItemExtractor {
    type Output = LineItem;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Items in document order, truncated to the configured maximum.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(parse_line_item)
            .take(self.max_items)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(description: &str, quantity: Option<&str>, amount_cents: u64) -> LineItem {
        LineItem {
            description: description.to_string(),
            quantity: quantity.map(str::to_string),
            amount_cents,
        }
    }

    #[test]
    fn test_item_with_quantity_and_unit() {
        assert_eq!(
            parse_line_item("Gypsum board 12.5mm   10 x m²   45,90 €"),
            Some(item("Gypsum board 12.5mm", Some("10 x m²"), 4590))
        );
    }

    #[test]
    fn test_item_quantity_variants() {
        assert_eq!(
            parse_line_item("Fliesenkleber C2TE 25kg   3 x   38,70"),
            Some(item("Fliesenkleber C2TE 25kg", Some("3 x"), 3870))
        );
        assert_eq!(
            parse_line_item("Trittschalldämmung   2,5 m²   12,40 EUR"),
            Some(item("Trittschalldämmung", Some("2,5 m²"), 1240))
        );
        assert_eq!(
            parse_line_item("Dübel 8x40 Nylon   100 Stk   9,95"),
            Some(item("Dübel 8x40 Nylon", Some("100 Stk"), 995))
        );
    }

    #[test]
    fn test_item_without_quantity() {
        assert_eq!(
            parse_line_item("Anfahrtspauschale Montage 1.250,00 €"),
            Some(item("Anfahrtspauschale Montage", None, 125000))
        );
    }

    #[test]
    fn test_rejects_short_lines() {
        assert_eq!(parse_line_item("Bolt 1,00"), None);
        assert_eq!(parse_line_item("Abc 12,00"), None);
    }

    #[test]
    fn test_rejects_summary_lines() {
        assert_eq!(parse_line_item("Zwischensumme     120,00 €"), None);
        assert_eq!(parse_line_item("zzgl. 19% MwSt    22,80 €"), None);
        assert_eq!(parse_line_item("Subtotal of order 120,00"), None);
        assert_eq!(parse_line_item("Net amount due    120,00"), None);
        assert_eq!(parse_line_item("Payment received  50,00 €"), None);
        assert_eq!(parse_line_item("% discount applied 5,00"), None);
    }

    #[test]
    fn test_rejects_compound_summary_labels() {
        assert_eq!(parse_line_item("Grandtotal order   500,00 €"), None);
        assert_eq!(parse_line_item("Rechnungstotal     500,00 €"), None);
        assert_eq!(parse_line_item("Sales tax 19%      95,00 €"), None);
        assert_eq!(parse_line_item("Prepayment deducted 50,00"), None);

        // English keywords that are common inside product names need a word boundary
        assert_eq!(
            parse_line_item("Private label paint   12,00 €"),
            Some(item("Private label paint", None, 1200))
        );
        assert_eq!(
            parse_line_item("Magnetic hooks set   8,50 €"),
            Some(item("Magnetic hooks set", None, 850))
        );
    }

    #[test]
    fn test_rejects_lines_without_trailing_amount() {
        assert_eq!(parse_line_item("Lieferung frei Baustelle"), None);
        assert_eq!(parse_line_item("Artikel 4711 kostet 12,00 laut Angebot"), None);
        assert_eq!(parse_line_item("Bohrhammer SDS-plus 1234,5"), None);
    }

    #[test]
    fn test_rejects_short_description() {
        assert_eq!(parse_line_item("Abc          12,00 €"), None);
    }

    #[test]
    fn test_rejects_implausible_amounts() {
        assert_eq!(parse_line_item("Sondermaschine   100.000,00 €"), None);
        assert_eq!(parse_line_item("Gratisprobe Kleber 0,00 €"), None);
    }

    #[test]
    fn test_extract_all_in_document_order() {
        let text = "\
            Pos Beschreibung Menge Betrag\n\
            Gipskarton 12,5mm   10 x m²   45,90 €\n\
            \n\
            Schrauben TN 3,5x25   2 Pck   13,80 €\n\
            Zwischensumme   59,70 €\n";

        let items = LineItemExtractor::new().extract_all(text);
        assert_eq!(
            items,
            vec![
                item("Gipskarton 12,5mm", Some("10 x m²"), 4590),
                item("Schrauben TN 3,5x25", Some("2 Pck"), 1380),
            ]
        );
    }

    #[test]
    fn test_never_more_than_thirty_items() {
        let text: String = (1..=45)
            .map(|i| format!("Artikel Nummer {}   {},50 €\n", i, i))
            .collect();

        let items = LineItemExtractor::new().extract_all(&text);
        assert_eq!(items.len(), MAX_LINE_ITEMS);
        assert_eq!(items[0], item("Artikel Nummer 1", None, 150));
        assert_eq!(items[29].description, "Artikel Nummer 30");

        let items = LineItemExtractor::new().with_max_items(100).extract_all(&text);
        assert_eq!(items.len(), MAX_LINE_ITEMS);

        let items = LineItemExtractor::new().with_max_items(5).extract_all(&text);
        assert_eq!(items.len(), 5);
    }
}
