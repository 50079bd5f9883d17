//! Document date extraction.

use lazy_static::lazy_static;

use super::patterns::{DATE_ANY, DATE_DATED, DATE_FALLBACK, DATE_LABEL_STRICT, DATE_LABELED};
use super::{ExtractionMatch, FieldExtractor, Rule, RuleChain};

lazy_static! {
    static ref DATE_RULES: RuleChain = RuleChain::new(vec![
        Rule::new("date-label", &DATE_LABELED, 0.95),
        Rule::new("date-dated", &DATE_DATED, 0.9),
        Rule::new("date-label-strict", &DATE_LABEL_STRICT, 0.9),
        Rule::new("date-first-in-2000s", &DATE_FALLBACK, 0.5),
    ]);
}

/// Normalize a `DD.MM.YYYY` or `YYYY-MM-DD` date into `YYYY-MM-DD`.
///
/// `.`, `/` and `-` are accepted as separators; day and month are zero-padded.
/// Two-digit years are rejected rather than guessing the century.
pub fn normalize_date(raw: &str) -> Option<String> {
    let parts: Vec<&str> = raw.trim().split(['.', '/', '-']).collect();
    let [first, middle, last] = parts.as_slice() else {
        return None;
    };

    if !parts
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    if last.len() == 4 {
        Some(format!("{}-{:0>2}-{:0>2}", last, middle, first))
    } else if first.len() == 4 {
        Some(format!("{}-{:0>2}-{:0>2}", first, middle, last))
    } else {
        None
    }
}

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        DATE_RULES.first_hit(text, normalize_date)
    }

    /// Every normalizable date token in document order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_ANY
            .captures_iter(text)
            .filter_map(|caps| {
                let token = caps.get(1)?;
                let date = normalize_date(token.as_str())?;
                Some(
                    ExtractionMatch::new(date, "date-any", 0.3, token.as_str())
                        .with_position(token.start(), token.end()),
                )
            })
            .collect()
    }
}
