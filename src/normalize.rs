//! Cell text extraction and header token normalization.
//!
//! Every heuristic in this crate compares cell content as text, so all cell
//! types funnel through one rendering function before any matching happens.

use calamine::Data;
use chrono::NaiveDateTime;

/// Renders a cell value as plain text without trimming or folding.
///
/// Numbers with no fractional part render without a decimal point so that a
/// numeric position code reads as "1" rather than "1.0". Datetime cells render
/// through chrono when the serial number converts; error cells read as empty.
pub(crate) fn raw_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(value) => value.to_owned(),
        Data::Float(value) => format_number(*value),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value
            .as_datetime()
            .as_ref()
            .map(NaiveDateTime::to_string)
            .unwrap_or_else(|| format_number(value.as_f64())),
        Data::DateTimeIso(value) => value.to_owned(),
        Data::DurationIso(value) => value.to_owned(),
    }
}

/// Formats a float, dropping the fractional part when it is exactly zero.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Canonicalizes a cell value into a comparable lowercase token.
///
/// Trims, lowercases, and rewrites the Unicode superscripts used in area and
/// volume units ("m²", "m³") to ASCII digits. Infallible; empty and error
/// cells yield the empty string.
pub(crate) fn normalize_token(cell: &Data) -> String {
    normalize_str(&raw_text(cell))
}

/// String flavor of [`normalize_token`] for values already rendered as text.
pub(crate) fn normalize_str(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace('²', "2")
        .replace('³', "3")
}

/// Extracts display text from a cell, preserving case.
///
/// Placeholder literals left behind by other tools ("nan", "none", "null")
/// count as empty, so they neither start positions nor pollute descriptions.
pub(crate) fn clean_text(cell: &Data) -> String {
    let text = raw_text(cell).trim().to_owned();
    match text.to_lowercase().as_str() {
        "" | "nan" | "none" | "null" => String::new(),
        _ => text,
    }
}
