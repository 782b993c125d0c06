//! Position assembly and numeric integrity.
//!
//! Data rows after the header are folded into positions by a small state
//! machine: a row whose mapped position cell is non-empty starts a new
//! position, everything else extends the current one. Subtotal rows are
//! dropped outright. All merge decisions for numeric fields go through one
//! fill-once combinator so the four fields behave identically.

use crate::columns::ColumnMapping;
use crate::normalize::clean_text;
use crate::normalize::normalize_token;
use crate::numeric::parse_decimal;
use crate::spreadsheet::RawSheet;
use crate::vocab::contains_total_marker;
use crate::vocab::is_allowed_unit;
use rust_decimal::Decimal;

/// Declared and computed totals may differ by at most this much.
const TOTAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// One priced BoQ line item, possibly assembled from several physical rows.
#[derive(Clone, Debug, PartialEq)]
pub struct BoqPosition {
    /// Label of the owning sheet.
    pub discipline: String,
    /// Hierarchical position code, never empty.
    pub position_id: String,
    /// Space-joined description fragments from all contributing rows.
    pub description: String,
    /// Unit of measure from the fixed vocabulary, or empty.
    pub unit: String,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
    /// quantity × unit_price with missing factors as zero.
    pub computed_total: Option<Decimal>,
    /// False only when a declared total disagrees with the computed one.
    pub total_matches: bool,
    /// Range-relative indices of the rows merged into this position.
    pub source_row_indices: Vec<usize>,
}

impl BoqPosition {
    fn new(discipline: &str, position_id: String) -> Self {
        BoqPosition {
            discipline: discipline.to_owned(),
            position_id,
            description: String::new(),
            unit: String::new(),
            quantity: None,
            unit_price: None,
            total_price: None,
            computed_total: None,
            total_matches: true,
            source_row_indices: Vec::new(),
        }
    }
}

/// Walks the data rows after the header and assembles positions.
///
/// Returns the positions in encounter order together with the sheet's
/// warnings. Nothing in here fails: malformed rows degrade to warnings or
/// missing fields.
pub(crate) fn parse_positions(
    sheet: &RawSheet,
    mapping: &ColumnMapping,
    header_row: usize,
    discipline: &str,
) -> (Vec<BoqPosition>, Vec<String>) {
    let mut positions = Vec::new();
    let mut warnings = Vec::new();
    let mut current: Option<BoqPosition> = None;
    let mut fragments: Vec<String> = Vec::new();

    for row in header_row + 1..sheet.row_count() {
        if is_total_row(sheet, row) {
            continue;
        }

        let raw_id = clean_text(sheet.cell(row, mapping.position_id));
        if !raw_id.is_empty() {
            if let Some(finished) = current.take() {
                positions.push(finalize(finished, &mut fragments, discipline, &mut warnings));
            }
            current = Some(BoqPosition::new(discipline, raw_id));
        }

        // Continuation rows before the first position have nothing to extend.
        let Some(position) = current.as_mut() else {
            continue;
        };
        position.source_row_indices.push(row);

        let fragment = clean_text(sheet.cell(row, mapping.description));
        if !fragment.is_empty() {
            fragments.push(fragment);
        }

        let unit_token = normalize_token(sheet.cell(row, mapping.unit));
        if position.unit.is_empty() && is_allowed_unit(&unit_token) {
            position.unit = unit_token;
        }

        fill_once(&mut position.quantity, parse_decimal(sheet.cell(row, mapping.quantity)));
        fill_once(&mut position.unit_price, parse_decimal(sheet.cell(row, mapping.unit_price)));
        fill_once(&mut position.total_price, parse_decimal(sheet.cell(row, mapping.total_price)));
    }

    if let Some(finished) = current.take() {
        positions.push(finalize(finished, &mut fragments, discipline, &mut warnings));
    }

    (positions, warnings)
}

/// True when any cell in the row contains a subtotal/total marker. Such rows
/// never start or extend a position.
fn is_total_row(sheet: &RawSheet, row: usize) -> bool {
    (0..sheet.width()).any(|column| contains_total_marker(&normalize_token(sheet.cell(row, column))))
}

/// First non-missing value wins; a later value may still replace a zero.
fn fill_once(slot: &mut Option<Decimal>, value: Option<Decimal>) {
    if let Some(value) = value {
        if slot.map_or(true, |current| current.is_zero()) {
            *slot = Some(value);
        }
    }
}

/// Closes a position: joins its description, checks numeric integrity, and
/// drains the fragment buffer for the next position.
fn finalize(
    mut position: BoqPosition,
    fragments: &mut Vec<String>,
    discipline: &str,
    warnings: &mut Vec<String>,
) -> BoqPosition {
    position.description = fragments.join(" ").trim().to_owned();
    fragments.clear();
    if position.description.is_empty() {
        warnings.push(format!(
            "Sheet {}: missing description for position {}",
            discipline, position.position_id
        ));
    }
    enforce_numeric_integrity(&mut position, warnings);
    position
}

/// Computes quantity × unit_price and reconciles it with the declared total.
///
/// A missing or zero declared total is replaced by the computed one and
/// counts as matching. A disagreement beyond the tolerance keeps the declared
/// total, flags the position, and warns; it never drops the position. Each
/// actually-null factor and a missing unit also warn.
fn enforce_numeric_integrity(position: &mut BoqPosition, warnings: &mut Vec<String>) {
    let quantity = position.quantity.unwrap_or(Decimal::ZERO);
    let unit_price = position.unit_price.unwrap_or(Decimal::ZERO);
    let computed = quantity * unit_price;
    position.computed_total = Some(computed);

    match position.total_price {
        Some(declared) if !declared.is_zero() => {
            let difference = (declared - computed).abs();
            position.total_matches = difference <= TOTAL_TOLERANCE;
            if !position.total_matches {
                warnings.push(format!(
                    "Position {} total mismatch: source={} computed={}",
                    position.position_id, declared, computed
                ));
            }
        }
        _ => {
            position.total_price = Some(computed);
            position.total_matches = true;
        }
    }

    if position.quantity.is_none() {
        warnings.push(format!("Position {} missing quantity", position.position_id));
    }
    if position.unit_price.is_none() {
        warnings.push(format!("Position {} missing unit price", position.position_id));
    }
    if position.unit.is_empty() {
        warnings.push(format!("Position {} missing unit of measure", position.position_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::Data;
    use rust_decimal_macros::dec;

    fn s(value: &str) -> Data {
        Data::String(value.to_owned())
    }

    fn n(value: f64) -> Data {
        Data::Float(value)
    }

    fn standard_mapping() -> ColumnMapping {
        ColumnMapping {
            position_id: 0,
            description: 1,
            unit: 2,
            quantity: 3,
            unit_price: 4,
            total_price: 5,
        }
    }

    fn assemble(rows: Vec<Vec<Data>>) -> (Vec<BoqPosition>, Vec<String>) {
        let mut grid = vec![vec![
            s("Poz."),
            s("Opis"),
            s("JM"),
            s("Količina"),
            s("Jed. cena"),
            s("Iznos"),
        ]];
        grid.extend(rows);
        let sheet = RawSheet::from_rows(grid);
        parse_positions(&sheet, &standard_mapping(), 0, "Test")
    }

    #[test]
    fn single_row_position() {
        let (positions, warnings) = assemble(vec![vec![
            s("1"),
            s("Beton"),
            s("m3"),
            n(10.0),
            n(100.0),
            n(1000.0),
        ]]);
        assert_eq!(positions.len(), 1);
        let position = &positions[0];
        assert_eq!(position.position_id, "1");
        assert_eq!(position.description, "Beton");
        assert_eq!(position.unit, "m3");
        assert_eq!(position.quantity, Some(dec!(10)));
        assert_eq!(position.unit_price, Some(dec!(100)));
        assert_eq!(position.total_price, Some(dec!(1000)));
        assert!(position.total_matches);
        assert_eq!(position.source_row_indices, vec![1]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn continuation_rows_extend_the_description() {
        let (positions, _) = assemble(vec![
            vec![s("1"), s("Beton"), s("m3"), n(10.0), n(100.0), n(1000.0)],
            vec![Data::Empty, s("MB30, u oplati"), Data::Empty, Data::Empty, Data::Empty, Data::Empty],
            vec![Data::Empty, s("sa negom"), Data::Empty, Data::Empty, Data::Empty, Data::Empty],
        ]);
        assert_eq!(positions.len(), 1);
        let position = &positions[0];
        assert_eq!(position.description, "Beton MB30, u oplati sa negom");
        assert_eq!(position.quantity, Some(dec!(10)));
        assert_eq!(position.source_row_indices, vec![1, 2, 3]);
    }

    #[test]
    fn first_non_empty_numeric_wins() {
        let (positions, _) = assemble(vec![
            vec![s("1"), s("Beton"), s("m3"), n(10.0), Data::Empty, Data::Empty],
            vec![Data::Empty, Data::Empty, Data::Empty, n(99.0), n(100.0), Data::Empty],
        ]);
        let position = &positions[0];
        assert_eq!(position.quantity, Some(dec!(10)));
        assert_eq!(position.unit_price, Some(dec!(100)));
    }

    #[test]
    fn a_later_value_replaces_a_zero() {
        let (positions, _) = assemble(vec![
            vec![s("1"), s("Beton"), s("m3"), n(0.0), n(100.0), Data::Empty],
            vec![Data::Empty, Data::Empty, Data::Empty, n(12.0), Data::Empty, Data::Empty],
        ]);
        assert_eq!(positions[0].quantity, Some(dec!(12)));
    }

    #[test]
    fn total_rows_are_dropped_entirely() {
        let (positions, _) = assemble(vec![
            vec![s("1"), s("Beton"), s("m3"), n(10.0), n(100.0), n(1000.0)],
            vec![Data::Empty, s("UKUPNO"), Data::Empty, Data::Empty, Data::Empty, n(1000.0)],
            vec![s("2"), s("Iskop"), s("m3"), n(5.0), n(50.0), n(250.0)],
        ]);
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].source_row_indices, vec![1]);
        assert_eq!(positions[1].source_row_indices, vec![3]);
    }

    #[test]
    fn continuation_before_any_position_is_ignored() {
        let (positions, warnings) = assemble(vec![
            vec![Data::Empty, s("napomena uz tabelu"), Data::Empty, Data::Empty, Data::Empty, Data::Empty],
            vec![s("1"), s("Beton"), s("m3"), n(10.0), n(100.0), n(1000.0)],
        ]);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].description, "Beton");
        assert_eq!(positions[0].source_row_indices, vec![2]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn missing_description_warns_but_keeps_the_position() {
        let (positions, warnings) = assemble(vec![vec![
            s("1"),
            Data::Empty,
            s("m3"),
            n(10.0),
            n(100.0),
            n(1000.0),
        ]]);
        assert_eq!(positions.len(), 1);
        assert!(warnings
            .iter()
            .any(|warning| warning.contains("missing description for position 1")));
    }

    #[test]
    fn absent_total_is_replaced_by_the_computed_one() {
        let (positions, warnings) = assemble(vec![vec![
            s("1"),
            s("Beton"),
            s("m3"),
            n(10.0),
            n(100.0),
            Data::Empty,
        ]]);
        let position = &positions[0];
        assert_eq!(position.total_price, Some(dec!(1000)));
        assert_eq!(position.computed_total, Some(dec!(1000)));
        assert!(position.total_matches);
        assert!(warnings.is_empty());
    }

    #[test]
    fn declared_total_mismatch_warns_and_flags() {
        let (positions, warnings) = assemble(vec![vec![
            s("1"),
            s("Beton"),
            s("m3"),
            n(10.0),
            n(100.0),
            n(1100.0),
        ]]);
        let position = &positions[0];
        assert!(!position.total_matches);
        assert_eq!(position.total_price, Some(dec!(1100)));
        assert_eq!(position.computed_total, Some(dec!(1000)));
        assert!(warnings.iter().any(|warning| warning.contains("total mismatch")));
    }

    #[test]
    fn mismatch_within_tolerance_passes() {
        let (positions, warnings) = assemble(vec![vec![
            s("1"),
            s("Beton"),
            s("m3"),
            n(10.0),
            n(100.0),
            n(1000.01),
        ]]);
        assert!(positions[0].total_matches);
        assert!(warnings.is_empty());
    }

    #[test]
    fn null_factors_warn_individually() {
        let (positions, warnings) = assemble(vec![vec![
            s("1"),
            s("Beton"),
            Data::Empty,
            Data::Empty,
            Data::Empty,
            Data::Empty,
        ]]);
        let position = &positions[0];
        assert_eq!(position.quantity, None);
        assert_eq!(position.total_price, Some(dec!(0)));
        assert!(position.total_matches);
        assert!(warnings.iter().any(|warning| warning.contains("missing quantity")));
        assert!(warnings.iter().any(|warning| warning.contains("missing unit price")));
        assert!(warnings.iter().any(|warning| warning.contains("missing unit of measure")));
    }

    #[test]
    fn locale_formatted_text_numbers_are_understood() {
        let (positions, _) = assemble(vec![vec![
            s("1"),
            s("Beton"),
            s("m3"),
            s("1.234,56"),
            s("2,50"),
            s("3.086,40"),
        ]]);
        let position = &positions[0];
        assert_eq!(position.quantity, Some(dec!(1234.56)));
        assert_eq!(position.unit_price, Some(dec!(2.5)));
        assert!(position.total_matches);
    }
}
