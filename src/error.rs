use thiserror::Error;

/// Fatal errors for workbook parsing.
///
/// Only container-level failures surface here; every condition inside a sheet
/// degrades to a warning on the sheet's result instead. Source BoQ documents
/// are irregular, hand-edited spreadsheets, so the parser favors best-effort
/// output plus warnings over aborting on a malformed sheet or row.
#[derive(Error, Debug)]
pub enum BoqError {
    #[error("Invalid xlsx file format: {0}")]
    InvalidXlsxFileFormat(#[from] calamine::XlsxError),

    #[error("Invalid xlsb file format: {0}")]
    InvalidXlsbFileFormat(#[from] calamine::XlsbError),

    #[error("Invalid xls file format: {0}")]
    InvalidXlsFileFormat(#[from] calamine::XlsError),

    #[error("Invalid ods file format: {0}")]
    InvalidOdsFileFormat(#[from] calamine::OdsError),

    #[error("Cannot detect file format for '{name}'")]
    InvalidFileFormat { name: String },
}
