//! # BoQ Parser
//!
//! A library for extracting Bill of Quantities (BoQ) data from spreadsheet
//! files. Source documents are irregular, hand-edited workbooks: headers vary
//! in spelling and language, item descriptions span several physical rows,
//! and subtotal rows are interleaved with the data. This crate recovers a
//! clean list of priced line items per sheet.
//!
//! ## Features
//!
//! - **Multi-format support**: Read Excel files (`.xls`, `.xlsx`, `.xlsm`,
//!   `.xlsb`, `.xla`, `.xlam`) and OpenDocument spreadsheet files (`.ods`)
//! - **Header detection**: Locates the header row behind arbitrary preamble
//!   rows by scoring cells against a multi-language variant dictionary
//! - **Structural inference**: Falls back to positional heuristics and
//!   content sniffing for columns the header match leaves unresolved
//! - **Multi-row positions**: Reassembles items whose description continues
//!   over several rows, with first-value-wins numeric merging
//! - **Numeric integrity**: Parses decimal-comma numerals and reconciles
//!   quantity × unit price against declared totals within a 0.01 tolerance
//! - **Best-effort output**: Everything inside a sheet degrades to warnings;
//!   only an unreadable file is an error
//!
//! ## Example
//!
//! ```no_run
//! let results = boq_parser::parse_workbook("predmer.xlsx")?;
//! for result in &results {
//!     println!("{}: {} positions", result.discipline, result.positions.len());
//!     for warning in &result.warnings {
//!         println!("  note: {warning}");
//!     }
//! }
//! # Ok::<(), boq_parser::BoqError>(())
//! ```

mod assembler;
mod columns;
mod error;
mod normalize;
mod numeric;
mod parser;
mod record;
mod spreadsheet;
mod vocab;

pub use crate::assembler::BoqPosition;
pub use crate::error::BoqError;
pub use crate::parser::parse_workbook;
pub use crate::parser::DisciplineResult;
pub use crate::record::DisciplineRecord;
pub use crate::record::PositionRecord;
