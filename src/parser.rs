//! Workbook driver.
//!
//! One sequential pass: every sheet, in file order, becomes one
//! [`DisciplineResult`]. A sheet whose header cannot be detected (or whose
//! range cannot be read) degrades to an empty result with a warning; only a
//! file that cannot be opened at all aborts the parse.

use crate::assembler::parse_positions;
use crate::assembler::BoqPosition;
use crate::columns::find_header_row;
use crate::columns::infer_columns;
use crate::columns::match_columns_by_name;
use crate::error::BoqError;
use crate::spreadsheet::RawSheet;
use crate::spreadsheet::Spreadsheet;
use std::path::Path;

/// Warning attached to a sheet in which no header row could be scored.
const HEADER_NOT_DETECTED: &str = "Header row could not be detected";

/// Parse result for one sheet, which stands for one discipline.
#[derive(Clone, Debug, PartialEq)]
pub struct DisciplineResult {
    /// Trimmed sheet name, used as the discipline label.
    pub discipline: String,
    /// Sheet name exactly as stored in the workbook.
    pub sheet_name: String,
    /// Assembled positions in encounter order.
    pub positions: Vec<BoqPosition>,
    /// Non-fatal findings, in the order they were recorded.
    pub warnings: Vec<String>,
}

/// Parses every sheet of the workbook at `path` into discipline results.
///
/// Results follow workbook sheet order. The parse is a pure function of the
/// file bytes: running it twice yields identical results.
///
/// # Errors
///
/// Fails only when the file cannot be opened or is not a readable
/// spreadsheet container.
pub fn parse_workbook<P>(path: P) -> Result<Vec<DisciplineResult>, BoqError>
where
    P: AsRef<Path>,
{
    let mut spreadsheet = Spreadsheet::open(path.as_ref())?;
    let mut results = Vec::new();
    for sheet_name in spreadsheet.sheet_names() {
        let sheet = match spreadsheet.raw_sheet(&sheet_name) {
            Ok(sheet) => sheet,
            Err(error) => {
                // Degrade the sheet, keep the rest of the workbook.
                log::warn!("sheet '{}' could not be read: {}", sheet_name, error);
                RawSheet::default()
            }
        };
        results.push(parse_sheet(&sheet, &sheet_name));
    }
    Ok(results)
}

/// Runs header detection, column mapping and position assembly on one grid.
pub(crate) fn parse_sheet(sheet: &RawSheet, sheet_name: &str) -> DisciplineResult {
    let discipline = sheet_name.trim().to_owned();
    let Some(header_row) = find_header_row(sheet) else {
        return DisciplineResult {
            discipline,
            sheet_name: sheet_name.to_owned(),
            positions: Vec::new(),
            warnings: vec![HEADER_NOT_DETECTED.to_owned()],
        };
    };
    let named = match_columns_by_name(sheet, header_row);
    let mapping = infer_columns(sheet, header_row, named);
    log::debug!(
        "sheet '{}': header at row {}, mapping {:?}",
        sheet_name,
        header_row,
        mapping
    );
    let (positions, warnings) = parse_positions(sheet, &mapping, header_row, &discipline);
    DisciplineResult {
        discipline,
        sheet_name: sheet_name.to_owned(),
        positions,
        warnings,
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

    fn boq_sheet() -> RawSheet {
        RawSheet::from_rows(vec![
            vec![s("Predmer i predračun")],
            vec![s("Poz."), s("Opis"), s("JM"), s("Količina"), s("Jed. cena"), s("Iznos")],
            vec![s("1"), s("Beton"), s("m3"), n(10.0), n(100.0), n(1000.0)],
            vec![Data::Empty, s("MB30"), Data::Empty, Data::Empty, Data::Empty, Data::Empty],
            vec![s("2"), s("Iskop"), s("m3"), n(5.0), n(50.0), Data::Empty],
            vec![s("UKUPNO"), Data::Empty, Data::Empty, Data::Empty, Data::Empty, n(1250.0)],
        ])
    }

    #[test]
    fn sheet_parses_into_positions_and_labels() {
        let result = parse_sheet(&boq_sheet(), " Građevinski radovi ");
        assert_eq!(result.discipline, "Građevinski radovi");
        assert_eq!(result.sheet_name, " Građevinski radovi ");
        assert_eq!(result.positions.len(), 2);
        assert_eq!(result.positions[0].description, "Beton MB30");
        assert_eq!(result.positions[1].total_price, Some(dec!(250)));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn undetectable_header_degrades_to_a_warning() {
        let sheet = RawSheet::from_rows(vec![
            vec![s("a"), s("b"), s("c")],
            vec![s("x"), s("y"), s("z")],
        ]);
        let result = parse_sheet(&sheet, "Prazno");
        assert!(result.positions.is_empty());
        assert_eq!(result.warnings, vec![HEADER_NOT_DETECTED.to_owned()]);
    }

    #[test]
    fn empty_sheet_degrades_the_same_way() {
        let result = parse_sheet(&RawSheet::default(), "Empty");
        assert!(result.positions.is_empty());
        assert_eq!(result.warnings, vec![HEADER_NOT_DETECTED.to_owned()]);
    }

    #[test]
    fn parsing_is_idempotent() {
        let first = parse_sheet(&boq_sheet(), "Radovi");
        let second = parse_sheet(&boq_sheet(), "Radovi");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_file_is_a_fatal_error() {
        let error = parse_workbook("definitely/not/there.xlsx").unwrap_err();
        assert!(matches!(error, BoqError::InvalidXlsxFileFormat(_)));
    }
}
