//! Plain-record views for the import collaborator.
//!
//! The importer keys categories by 1-based sheet order and upserts positions
//! by (parent, position_id); it wants flat numeric fields, not decimals with
//! scale. Missing quantities render as 0.0, and `computed_total` only appears
//! when it disagrees with the declared total.

use crate::assembler::BoqPosition;
use crate::parser::DisciplineResult;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Flat view of one position.
#[derive(Clone, Debug, Serialize)]
pub struct PositionRecord {
    pub discipline: String,
    pub position_id: String,
    pub description: String,
    pub unit: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_total: Option<f64>,
}

/// Flat view of one sheet's parse result.
#[derive(Clone, Debug, Serialize)]
pub struct DisciplineRecord {
    pub discipline: String,
    pub sheet_name: String,
    pub positions: Vec<PositionRecord>,
    pub warnings: Vec<String>,
}

fn to_f64(value: Option<Decimal>) -> f64 {
    value.and_then(|decimal| decimal.to_f64()).unwrap_or(0.0)
}

impl BoqPosition {
    /// Converts the position into its flat record form.
    pub fn to_record(&self) -> PositionRecord {
        PositionRecord {
            discipline: self.discipline.clone(),
            position_id: self.position_id.clone(),
            description: self.description.clone(),
            unit: self.unit.clone(),
            quantity: to_f64(self.quantity),
            unit_price: to_f64(self.unit_price),
            total_price: to_f64(self.total_price),
            computed_total: if self.total_matches {
                None
            } else {
                self.computed_total.and_then(|decimal| decimal.to_f64())
            },
        }
    }
}

impl DisciplineResult {
    /// Converts the result into its flat record form.
    pub fn to_record(&self) -> DisciplineRecord {
        DisciplineRecord {
            discipline: self.discipline.clone(),
            sheet_name: self.sheet_name.clone(),
            positions: self.positions.iter().map(BoqPosition::to_record).collect(),
            warnings: self.warnings.clone(),
        }
    }
}
