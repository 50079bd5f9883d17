//! German display formatting for extracted values.

use chrono::NaiveDate;

/// Format cents as a German euro amount, e.g. `1.234,56 €`.
///
/// The currency sign is separated by a non-breaking space.
pub fn format_cents(cents: u64) -> String {
    format!("{}\u{a0}€", cents_to_german(cents, true))
}

/// Format cents for an editable input field, e.g. `1234,56`.
pub fn cents_to_input_value(cents: u64) -> String {
    cents_to_german(cents, false)
}

/// Format an ISO `YYYY-MM-DD` date as `DD.MM.YYYY`.
///
/// Returns `None` when the input does not name a real calendar day.
pub fn format_date(iso: &str) -> Option<String> {
    NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%d.%m.%Y").to_string())
}

fn cents_to_german(cents: u64, grouped: bool) -> String {
    let euros = (cents / 100).to_string();
    let fraction = cents % 100;

    let euros = if grouped { group_thousands(&euros) } else { euros };
    format!("{},{:02}", euros, fraction)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
