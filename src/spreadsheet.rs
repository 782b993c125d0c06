//! Unified access to spreadsheet containers.
//!
//! Wraps the calamine readers behind one enum so the rest of the crate only
//! ever sees a [`RawSheet`]: a dense, row-major grid of untyped cell values
//! with out-of-range lookups reading as empty. The file handle lives inside
//! the calamine reader and is released when the wrapper is dropped.

use crate::error::BoqError;
use calamine::open_workbook;
use calamine::Data;
use calamine::Ods;
use calamine::Range;
use calamine::Reader;
use calamine::Xls;
use calamine::Xlsb;
use calamine::Xlsx;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

type FileReader = BufReader<File>;

const EMPTY_CELL: Data = Data::Empty;

/// Reader for one of the supported spreadsheet container formats.
pub(crate) enum Spreadsheet {
    /// Excel 2007+ format (.xlsx, .xlsm, .xlam)
    Xlsx(Xlsx<FileReader>),
    /// Excel Binary format (.xlsb)
    Xlsb(Xlsb<FileReader>),
    /// Legacy Excel format (.xls, .xla)
    Xls(Xls<FileReader>),
    /// OpenDocument format (.ods)
    Ods(Ods<FileReader>),
}

impl Spreadsheet {
    /// Opens a spreadsheet file, selecting the reader by file extension.
    ///
    /// Failure here is the only fatal condition in the crate: an unreadable
    /// or unrecognized container aborts the whole parse.
    pub(crate) fn open<P>(path: P) -> Result<Spreadsheet, BoqError>
    where
        P: AsRef<Path>,
    {
        match path.as_ref().extension().and_then(OsStr::to_str) {
            Some("xlsx") | Some("xlsm") | Some("xlam") => Ok(Self::Xlsx(open_workbook(path)?)),
            Some("xlsb") => Ok(Self::Xlsb(open_workbook(path)?)),
            Some("xls") | Some("xla") => Ok(Self::Xls(open_workbook(path)?)),
            Some("ods") => Ok(Self::Ods(open_workbook(path)?)),
            _ => Err(BoqError::InvalidFileFormat {
                name: path.as_ref().to_string_lossy().to_string(),
            }),
        }
    }

    /// Returns the sheet names in workbook file order.
    pub(crate) fn sheet_names(&self) -> Vec<String> {
        match self {
            Self::Xlsx(xlsx) => xlsx.sheet_names(),
            Self::Xlsb(xlsb) => xlsb.sheet_names(),
            Self::Xls(xls) => xls.sheet_names(),
            Self::Ods(ods) => ods.sheet_names(),
        }
    }

    /// Loads one sheet as a dense grid.
    pub(crate) fn raw_sheet(&mut self, sheet_name: &str) -> Result<RawSheet, BoqError> {
        let range = match self {
            Self::Xlsx(xlsx) => xlsx.worksheet_range(sheet_name)?,
            Self::Xlsb(xlsb) => xlsb.worksheet_range(sheet_name)?,
            Self::Xls(xls) => xls.worksheet_range(sheet_name)?,
            Self::Ods(ods) => ods.worksheet_range(sheet_name)?,
        };
        Ok(RawSheet::from_range(&range))
    }
}

/// An ordered 2-D grid of untyped cell values, no header assumed.
///
/// Row and column indices are relative to the sheet's used range. `width` is
/// the maximum column count across rows; shorter rows read as having empty
/// trailing cells.
#[derive(Debug, Default)]
pub(crate) struct RawSheet {
    rows: Vec<Vec<Data>>,
    width: usize,
}

impl RawSheet {
    /// Builds a grid from explicit rows. Test seams and sheet degradation
    /// both come through here.
    pub(crate) fn from_rows(rows: Vec<Vec<Data>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        RawSheet { rows, width }
    }

    fn from_range(range: &Range<Data>) -> Self {
        Self::from_rows(range.rows().map(<[Data]>::to_vec).collect())
    }

    /// Number of rows in the used range.
    pub(crate) fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Maximum column count across rows.
    pub(crate) fn width(&self) -> usize {
        self.width
    }

    /// Cell lookup with the "out-of-range means empty" convention.
    pub(crate) fn cell(&self, row: usize, column: usize) -> &Data {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY_CELL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_the_longest_row() {
        let sheet = RawSheet::from_rows(vec![
            vec![Data::Int(1)],
            vec![Data::Int(1), Data::Int(2), Data::Int(3)],
            vec![],
        ]);
        assert_eq!(sheet.width(), 3);
        assert_eq!(sheet.row_count(), 3);
    }

    #[test]
    fn out_of_range_reads_as_empty() {
        let sheet = RawSheet::from_rows(vec![vec![Data::Int(1)]]);
        assert_eq!(*sheet.cell(0, 0), Data::Int(1));
        assert_eq!(*sheet.cell(0, 5), Data::Empty);
        assert_eq!(*sheet.cell(9, 0), Data::Empty);
    }

    #[test]
    fn empty_grid_has_no_rows() {
        let sheet = RawSheet::default();
        assert_eq!(sheet.row_count(), 0);
        assert_eq!(sheet.width(), 0);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let error = match Spreadsheet::open("boq.txt") {
            Ok(_) => panic!("a .txt file must not open as a spreadsheet"),
            Err(error) => error,
        };
        assert!(matches!(error, BoqError::InvalidFileFormat { .. }));
    }
}
