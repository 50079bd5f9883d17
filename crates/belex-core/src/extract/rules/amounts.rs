//! Amount normalization and total-amount extraction.

use std::str::FromStr;

use lazy_static::lazy_static;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::patterns::{
    AMOUNT_DECIMAL_POINT, AMOUNT_GERMAN_GROUPED, AMOUNT_GERMAN_SIMPLE, CURRENCY_AMOUNT,
    CURRENCY_MARKER, LINE_AMOUNT, NUMERIC_PREFIX, TOTAL_LABELED, TOTAL_REVERSED,
};
use super::{ExtractionMatch, FieldExtractor, Rule, RuleChain};

lazy_static! {
    static ref TOTAL_RULES: RuleChain = RuleChain::new(vec![
        Rule::new("total-label", &TOTAL_LABELED, 0.95),
        Rule::new("total-reversed", &TOTAL_REVERSED, 0.9),
    ]);
}

/// Convert a locale-ambiguous amount string into integer cents.
///
/// Recognized forms, in priority order: `1.234,56`, `1234,56`, `1234.56`.
/// Anything else drops every `.` as grouping and reads the last `,` as the
/// decimal separator. Returns 0 when the input is not a positive number;
/// callers treat 0 as "no amount".
pub fn parse_amount_to_cents(raw: &str) -> u64 {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let normalized = if AMOUNT_GERMAN_GROUPED.is_match(&cleaned) {
        cleaned.replace('.', "").replacen(',', ".", 1)
    } else if AMOUNT_GERMAN_SIMPLE.is_match(&cleaned) {
        cleaned.replacen(',', ".", 1)
    } else if AMOUNT_DECIMAL_POINT.is_match(&cleaned) {
        cleaned
    } else {
        // TODO: "1.234" is read as 1234, not 1.234; needs a product decision before changing
        replace_last_comma(&cleaned.replace('.', ""))
    };

    let Some(number) = NUMERIC_PREFIX.find(&normalized).map(|m| m.as_str()) else {
        return 0;
    };
    if number.starts_with('-') {
        return 0;
    }

    let number = if number.starts_with('.') {
        format!("0{}", number)
    } else {
        number.to_string()
    };

    let Ok(value) = Decimal::from_str(&number) else {
        return 0;
    };
    if value <= Decimal::ZERO {
        return 0;
    }

    value
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|cents| cents.to_u64())
        .unwrap_or(0)
}

fn replace_last_comma(s: &str) -> String {
    match s.rfind(',') {
        Some(i) => format!("{}.{}", &s[..i], &s[i + 1..]),
        None => s.to_string(),
    }
}

fn positive_cents(raw: &str) -> Option<u64> {
    match parse_amount_to_cents(raw) {
        0 => None,
        cents => Some(cents),
    }
}

/// Total-amount extractor with three fallback tiers.
///
/// 1. A total label (or "€ <amount> incl. VAT") next to the amount.
/// 2. The largest currency-tagged amount anywhere in the text.
/// 3. The first amount on the last line mentioning the currency.
pub struct TotalAmountExtractor;

impl TotalAmountExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Tier 1: keyword-anchored total.
    pub fn labeled_total(&self, text: &str) -> Option<ExtractionMatch<u64>> {
        TOTAL_RULES.find_map(text, positive_cents)
    }

    /// Tier 2: the largest `€ <amount>` / `EUR <amount>` figure in the text.
    pub fn largest_currency_amount(&self, text: &str) -> Option<ExtractionMatch<u64>> {
        self.extract_all(text)
            .into_iter()
            .max_by_key(|m| m.value)
            .map(|m| ExtractionMatch { rule: "largest-currency-amount", confidence: 0.6, ..m })
    }

    /// Tier 3: scanning lines bottom-up, the first currency line carrying an amount.
    pub fn last_currency_line(&self, text: &str) -> Option<ExtractionMatch<u64>> {
        text.lines()
            .rev()
            .filter(|line| CURRENCY_MARKER.is_match(line))
            .find_map(|line| {
                let token = LINE_AMOUNT.find(line)?;
                let cents = positive_cents(token.as_str())?;
                Some(ExtractionMatch::new(cents, "last-currency-line", 0.4, token.as_str()))
            })
    }
}

impl Default for TotalAmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TotalAmountExtractor {
    type Output = ExtractionMatch<u64>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        if let Some(total) = self.labeled_total(text) {
            return Some(total);
        }

        debug!("No labeled total found, trying largest currency amount");
        if let Some(total) = self.largest_currency_amount(text) {
            return Some(total);
        }

        debug!("No currency-tagged amount found, scanning currency lines from the end");
        self.last_currency_line(text)
    }

    /// All positive currency-tagged amounts in document order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CURRENCY_AMOUNT
            .captures_iter(text)
            .filter_map(|caps| {
                let token = caps.get(1)?;
                let cents = positive_cents(token.as_str())?;
                Some(
                    ExtractionMatch::new(cents, "currency-amount", 0.6, token.as_str())
                        .with_position(token.start(), token.end()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_well_defined_forms_agree() {
        assert_eq!(parse_amount_to_cents("1.234,56"), 123456);
        assert_eq!(parse_amount_to_cents("1234,56"), 123456);
        assert_eq!(parse_amount_to_cents("1234.56"), 123456);
        assert_eq!(parse_amount_to_cents("12.345.678,90"), 1234567890);
    }

    #[test]
    fn test_parse_strips_whitespace() {
        assert_eq!(parse_amount_to_cents("  1 234,56 "), 123456);
        assert_eq!(parse_amount_to_cents("1\u{00a0}234,56"), 123456);
    }

    #[test]
    fn test_parse_rejects_non_positive_and_garbage() {
        assert_eq!(parse_amount_to_cents("-5,00"), 0);
        assert_eq!(parse_amount_to_cents("abc"), 0);
        assert_eq!(parse_amount_to_cents(""), 0);
        assert_eq!(parse_amount_to_cents("0,00"), 0);
        assert_eq!(parse_amount_to_cents(",."), 0);
    }

    #[test]
    fn test_parse_generic_fallback() {
        // dots are grouping, the last comma is the decimal separator
        assert_eq!(parse_amount_to_cents("1.234"), 123400);
        assert_eq!(parse_amount_to_cents("1.234,5"), 123450);
        assert_eq!(parse_amount_to_cents("15"), 1500);
        assert_eq!(parse_amount_to_cents("1.234,56."), 123456);
        // only the last comma becomes a point, so the prefix parse stops at "1"
        assert_eq!(parse_amount_to_cents("1,234,56"), 100);
    }

    #[test]
    fn test_parse_rounds_half_up() {
        assert_eq!(parse_amount_to_cents("0,125"), 13);
        assert_eq!(parse_amount_to_cents("2,345"), 235);
    }

    #[test]
    fn test_parse_reads_numeric_prefix() {
        assert_eq!(parse_amount_to_cents("12,50EUR"), 1250);
        assert_eq!(parse_amount_to_cents(",50"), 50);
    }

    #[test]
    fn test_labeled_total() {
        let extractor = TotalAmountExtractor::new();
        let found = extractor
            .extract("Nettobetrag 1.000,00\nGesamtbetrag: EUR 1.190,00")
            .unwrap();
        assert_eq!(found.value, 119000);
        assert_eq!(found.rule, "total-label");
    }

    #[test]
    fn test_english_labels() {
        let extractor = TotalAmountExtractor::new();
        assert_eq!(extractor.extract("Amount due: € 89,90").unwrap().value, 8990);
        assert_eq!(extractor.extract("Total amount: 1.234,56 EUR").unwrap().value, 123456);
        assert_eq!(extractor.extract("Invoice total 42.00").unwrap().value, 4200);
    }

    #[test]
    fn test_subtotal_is_not_a_total_label() {
        let extractor = TotalAmountExtractor::new();
        assert!(extractor.labeled_total("Subtotal 80,00").is_none());
    }

    #[test]
    fn test_reversed_label() {
        let extractor = TotalAmountExtractor::new();
        let found = extractor.labeled_total("Summe: € 238,00 inkl. MwSt").unwrap();
        assert_eq!(found.value, 23800);
        assert_eq!(found.rule, "total-reversed");
    }

    #[test]
    fn test_zero_label_falls_through_to_next_rule() {
        let extractor = TotalAmountExtractor::new();
        let found = extractor.labeled_total("Total: 0,00\n€ 59,00 brutto").unwrap();
        assert_eq!(found.value, 5900);
    }

    #[test]
    fn test_largest_currency_amount() {
        let extractor = TotalAmountExtractor::new();
        let text = "€ 100,00 net\nshipping € 500,00\n€ 12,00 fee";
        let found = extractor.extract(text).unwrap();
        assert_eq!(found.value, 50000);
        assert_eq!(found.rule, "largest-currency-amount");
    }

    #[test]
    fn test_largest_amount_handles_grouping() {
        let extractor = TotalAmountExtractor::new();
        let found = extractor
            .largest_currency_amount("EUR 999,00 and EUR 1.250,00")
            .unwrap();
        assert_eq!(found.value, 125000);
    }

    #[test]
    fn test_currency_amount_followed_by_digits() {
        let extractor = TotalAmountExtractor::new();
        let found = extractor.extract("Lieferung € 12,345 und mehr").unwrap();
        assert_eq!(found.value, 1234);
        assert_eq!(found.rule, "largest-currency-amount");
    }

    #[test]
    fn test_last_currency_line() {
        let extractor = TotalAmountExtractor::new();
        let text = "Position A 10,00 €\nPosition B 25,50 €\nThank you";
        let found = extractor.extract(text).unwrap();
        assert_eq!(found.value, 2550);
        assert_eq!(found.rule, "last-currency-line");
    }

    #[test]
    fn test_no_total() {
        let extractor = TotalAmountExtractor::new();
        assert!(extractor.extract("Random text without any recognizable fields.").is_none());
        assert!(extractor.extract("Amount in EUR to follow").is_none());
    }

    #[test]
    fn test_extract_all_currency_amounts() {
        let extractor = TotalAmountExtractor::new();
        let all = extractor.extract_all("€ 1,00 / EUR 2,50 / 3,00 €");
        let values: Vec<u64> = all.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![100, 250]);
    }
}
