//! Rule-based field extractors for invoices and delivery notes.

pub mod amounts;
pub mod dates;
pub mod line_items;
pub mod numbers;
pub mod patterns;

pub use amounts::{parse_amount_to_cents, TotalAmountExtractor};
pub use dates::{normalize_date, DateExtractor};
pub use line_items::{parse_line_item, LineItemExtractor};
pub use numbers::DocumentNumberExtractor;

use regex::Regex;
use tracing::debug;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.extract(text).into_iter().collect()
    }
}

/// A value recovered from the text, with the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule or fallback tier that matched.
    pub rule: &'static str,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte span of the matched source text, when known.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: &'static str, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// One keyword-anchored pattern and the capture group holding the value.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub pattern: &'static Regex,
    pub group: usize,
    pub confidence: f32,
}

impl Rule {
    pub const fn new(name: &'static str, pattern: &'static Regex, confidence: f32) -> Self {
        Self {
            name,
            pattern,
            group: 1,
            confidence,
        }
    }
}

/// An ordered list of rules evaluated with "first match wins" semantics.
#[derive(Debug, Clone)]
pub struct RuleChain {
    rules: Vec<Rule>,
}

impl RuleChain {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Run the chain, returning the first capture that `accept` turns into a value.
    ///
    /// Each rule contributes its first match in the text only. A capture that
    /// `accept` rejects hands over to the next rule.
    pub fn find_map<T, F>(&self, text: &str, accept: F) -> Option<ExtractionMatch<T>>
    where
        F: Fn(&str) -> Option<T>,
    {
        for rule in &self.rules {
            let Some(capture) = rule
                .pattern
                .captures(text)
                .and_then(|caps| caps.get(rule.group))
            else {
                continue;
            };

            match accept(capture.as_str()) {
                Some(value) => {
                    debug!("Rule {} matched {:?}", rule.name, capture.as_str());
                    return Some(
                        ExtractionMatch::new(value, rule.name, rule.confidence, capture.as_str())
                            .with_position(capture.start(), capture.end()),
                    );
                }
                None => {
                    debug!("Rule {} matched {:?} but the value was rejected", rule.name, capture.as_str());
                }
            }
        }

        None
    }

    /// Run the chain, stopping at the first rule whose pattern matches.
    ///
    /// Unlike [`RuleChain::find_map`], a capture that `accept` rejects ends
    /// the search with `None`.
    pub fn first_hit<T, F>(&self, text: &str, accept: F) -> Option<ExtractionMatch<T>>
    where
        F: Fn(&str) -> Option<T>,
    {
        let (rule, capture) = self.rules.iter().find_map(|rule| {
            let capture = rule.pattern.captures(text)?.get(rule.group)?;
            Some((rule, capture))
        })?;

        let Some(value) = accept(capture.as_str()) else {
            debug!("Rule {} matched {:?} but the value was rejected", rule.name, capture.as_str());
            return None;
        };

        debug!("Rule {} matched {:?}", rule.name, capture.as_str());
        Some(
            ExtractionMatch::new(value, rule.name, rule.confidence, capture.as_str())
                .with_position(capture.start(), capture.end()),
        )
    }

    /// Run the chain, returning the first capture trimmed of whitespace.
    pub fn first_match(&self, text: &str) -> Option<ExtractionMatch<String>> {
        self.find_map(text, |raw| {
            let value = raw.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
    }
}
