//! Locale-flavored numeric parsing.
//!
//! Source workbooks follow the Serbian/European numeral convention: "." is a
//! thousands separator and "," the decimal point, so "1.234,56" reads as
//! 1234.56. This is a fixed, documented assumption; there is no locale
//! auto-detection.

use calamine::Data;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

/// First optional-sign digit run with embedded separators, e.g. "-1.234,56".
static NUMERIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+[\d.,]*").expect("numeric pattern"));

/// Interprets a cell as a decimal number.
///
/// Native numeric cells pass through directly (NaN floats count as missing);
/// text cells go through [`parse_decimal_text`]. Anything else is `None`,
/// which downstream code treats as a missing field, never as an error.
pub(crate) fn parse_decimal(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Int(value) => Some(Decimal::from(*value)),
        Data::Float(value) => {
            if value.is_nan() {
                None
            } else {
                Some(f64_to_decimal(*value))
            }
        }
        Data::String(value) => parse_decimal_text(value),
        _ => None,
    }
}

/// Extracts the first numeric substring from free-form text and reinterprets
/// it under the decimal-comma convention.
pub(crate) fn parse_decimal_text(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let text = text.replace('\u{a0}', " ");
    let matched = NUMERIC_PATTERN.find(&text)?;
    let number = matched.as_str().replace('.', "").replace(',', ".");
    number.parse::<Decimal>().ok()
}

/// Converts an f64 through a string round-trip to avoid binary-float
/// artifacts (0.0035_f64 must not become 0.00349999...).
pub(crate) fn f64_to_decimal(value: f64) -> Decimal {
    value
        .to_string()
        .parse::<Decimal>()
        .unwrap_or_else(|_| Decimal::try_from(value).unwrap_or_default())
}
