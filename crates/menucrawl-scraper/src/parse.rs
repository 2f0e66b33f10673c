//! Text parsing for values scraped off listing cards and menu items.
//!
//! Prices use manual byte scanning; ratings go through the profile's regex.

use regex::Regex;

/// Splits a rating element's `title` into `(average_rating, review_count)`.
///
/// Both values are `None` when the title is absent or does not match.
#[must_use]
pub(crate) fn parse_rating(title: Option<&str>, pattern: &Regex) -> (Option<String>, Option<String>) {
    let Some(caps) = title.and_then(|t| pattern.captures(t)) else {
        return (None, None);
    };
    let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string());
    (group(1), group(2))
}

/// Parses a currency-formatted price such as `"$12.50"`, `"€1,299.00"` or
/// `"€12,50"`.
///
/// Rules:
/// - surrounding whitespace and one leading currency symbol are dropped
/// - a `,` followed by a three-digit group is a thousands separator and is
///   ignored; a `,` followed by one or two digits is the decimal point
/// - the leading numeric run is read and any trailing text is ignored
///
/// Returns `None` if no digits lead the value or the result is negative
/// or not finite.
#[must_use]
pub(crate) fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let unprefixed = trimmed
        .strip_prefix(|c: char| matches!(c, '$' | '€' | '£' | '¥' | '₹' | '₩'))
        .unwrap_or(trimmed)
        .trim_start();

    let chars: Vec<char> = unprefixed.chars().collect();
    let mut number = String::with_capacity(chars.len());
    let mut seen_dot = false;
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '0'..='9' => number.push(c),
            ',' if !seen_dot && !number.is_empty() => {
                if is_decimal_comma(&chars[i + 1..]) {
                    seen_dot = true;
                    number.push('.');
                }
            }
            '.' if !seen_dot => {
                seen_dot = true;
                number.push(c);
            }
            _ => break,
        }
    }

    if !number.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: f64 = number.trim_end_matches('.').parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn is_decimal_comma(rest: &[char]) -> bool {
    let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
    matches!(digits, 1 | 2)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
