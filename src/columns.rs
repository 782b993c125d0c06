//! Header detection and column mapping.
//!
//! Recovery runs in three phases: locate the header row by scoring cells
//! against the variant dictionary, map columns by exact header match, then
//! fill whatever is left by structural inference over the data area. After
//! inference the mapping is total: all six fields carry an in-range column
//! index, however low the confidence.

use crate::normalize::normalize_token;
use crate::spreadsheet::RawSheet;
use crate::vocab::is_allowed_unit;
use crate::vocab::is_position_code;
use crate::vocab::Field;
use crate::vocab::COLUMN_VARIANTS;
use std::collections::HashMap;

/// Minimum non-empty cells for a row to be considered as a header.
const MIN_HEADER_CELLS: usize = 3;

/// Score at which header scanning stops early.
const GOOD_ENOUGH_SCORE: u32 = 4;

/// Total assignment of canonical fields to column indices.
///
/// Indices may coincide: the unit column doubles as the price fallback when a
/// sheet is too narrow for separate columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ColumnMapping {
    pub(crate) position_id: usize,
    pub(crate) description: usize,
    pub(crate) unit: usize,
    pub(crate) quantity: usize,
    pub(crate) unit_price: usize,
    pub(crate) total_price: usize,
}

/// Scans the sheet from the top for the most header-like row.
///
/// Rows with fewer than three non-empty cells are too sparse to be headers.
/// A cell scores 2 per variant list containing it and 1 when it is a unit
/// token. Scanning stops at the first row scoring at least 4; this early exit
/// prefers earlier good rows and is a deliberate speed/precision tradeoff --
/// a data row dense with unit-like tokens can win over a later true header.
///
/// Returns `None` when no row scores above 0.
pub(crate) fn find_header_row(sheet: &RawSheet) -> Option<usize> {
    let mut best_idx = None;
    let mut best_score = 0;
    for row in 0..sheet.row_count() {
        let normalized: Vec<String> = (0..sheet.width())
            .map(|column| normalize_token(sheet.cell(row, column)))
            .collect();
        let non_empty = normalized.iter().filter(|cell| !cell.is_empty()).count();
        if non_empty < MIN_HEADER_CELLS {
            continue;
        }
        let mut score = 0;
        for cell in &normalized {
            for (_, variants) in COLUMN_VARIANTS {
                if variants.contains(&cell.as_str()) {
                    score += 2;
                }
            }
            if is_allowed_unit(cell) {
                score += 1;
            }
        }
        if score > best_score {
            best_score = score;
            best_idx = Some(row);
        }
        if score >= GOOD_ENOUGH_SCORE {
            break;
        }
    }
    best_idx
}

/// Maps columns by exact header-variant match.
///
/// The first matching column per field wins; later duplicate headers are
/// ignored. When one header token appears in two fields' variant lists the
/// field listed first in [`COLUMN_VARIANTS`] takes it.
pub(crate) fn match_columns_by_name(sheet: &RawSheet, header_row: usize) -> HashMap<Field, usize> {
    let mut mapping = HashMap::new();
    for column in 0..sheet.width() {
        let normalized = normalize_token(sheet.cell(header_row, column));
        if normalized.is_empty() {
            continue;
        }
        for (field, variants) in COLUMN_VARIANTS {
            if variants.contains(&normalized.as_str()) && !mapping.contains_key(field) {
                mapping.insert(*field, column);
            }
        }
    }
    mapping
}

/// Fills unmapped fields by positional heuristics and content sniffing.
///
/// Inference order is fixed: unit, quantity, total_price, unit_price,
/// position_id, description. The price guesses depend on the already-resolved
/// unit and quantity columns, so order matters.
pub(crate) fn infer_columns(
    sheet: &RawSheet,
    header_row: usize,
    mut mapping: HashMap<Field, usize>,
) -> ColumnMapping {
    let last_column = sheet.width().saturating_sub(1);

    if !mapping.contains_key(&Field::Unit) {
        let unit = best_column(sheet, |token| is_allowed_unit(token), header_row);
        mapping.insert(Field::Unit, unit);
    }
    let unit = mapping[&Field::Unit];

    if !mapping.contains_key(&Field::Quantity) {
        // Immediately left of the unit column, clamped to column 0.
        mapping.insert(Field::Quantity, unit.saturating_sub(1));
    }
    let quantity = mapping[&Field::Quantity];

    if !mapping.contains_key(&Field::TotalPrice) {
        let candidate = unit + 1;
        mapping.insert(
            Field::TotalPrice,
            if candidate < sheet.width() { candidate } else { unit },
        );
    }

    if !mapping.contains_key(&Field::UnitPrice) {
        let candidate = quantity + 1;
        mapping.insert(
            Field::UnitPrice,
            if candidate == unit { unit } else { candidate.min(last_column) },
        );
    }

    if !mapping.contains_key(&Field::PositionId) {
        let position_id = best_column(sheet, |token| is_position_code(token), header_row);
        mapping.insert(Field::PositionId, position_id);
    }

    if !mapping.contains_key(&Field::Description) {
        let candidate = mapping[&Field::PositionId] + 1;
        mapping.insert(Field::Description, candidate.min(last_column));
    }

    ColumnMapping {
        position_id: mapping[&Field::PositionId],
        description: mapping[&Field::Description],
        unit: mapping[&Field::Unit],
        quantity: mapping[&Field::Quantity],
        unit_price: mapping[&Field::UnitPrice],
        total_price: mapping[&Field::TotalPrice],
    }
}

/// Picks the column whose data-area cells most often satisfy the predicate.
/// Ties break to the lowest column index.
fn best_column<F>(sheet: &RawSheet, predicate: F, header_row: usize) -> usize
where
    F: Fn(&str) -> bool,
{
    let mut best_column = 0;
    let mut best_hits = 0;
    for column in 0..sheet.width() {
        let hits = (header_row + 1..sheet.row_count())
            .filter(|row| predicate(&normalize_token(sheet.cell(*row, column))))
            .count();
        if hits > best_hits {
            best_hits = hits;
            best_column = column;
        }
    }
    best_column
}
