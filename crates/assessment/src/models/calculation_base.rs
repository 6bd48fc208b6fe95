use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AssessmentError, Result};

/// One flattened scoring input row: a supplier's submission for one requirement
/// and submission type, joined with the assessment's weightings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CalculationBase {
    pub assessment_id: i32,
    pub supplier_id: String,
    pub dimension_id: i32,
    pub dimension_name: String,
    pub requirement_name: String,
    pub submission_type_name: String,
    pub submission_value: Option<String>,
    pub dimension_divisor: i32,
    #[sqlx(rename = "asel_weighting_pct")]
    pub selection_weight_pct: Decimal,
    #[sqlx(rename = "adw_weighting_pct")]
    pub dimension_weight_pct: Decimal,
}

impl CalculationBase {
    /// The submission value as a number. A missing or blank value counts as zero.
    ///
    /// Negative values are rejected.
    pub fn numeric_value(&self) -> Result<Decimal> {
        let raw = match self.submission_value.as_deref().map(str::trim) {
            None | Some("") => return Ok(Decimal::ZERO),
            Some(raw) => raw,
        };

        let value = Decimal::from_str(raw).map_err(|_| {
            AssessmentError::validation(format!(
                "Submission value [{raw}] for supplier [{}] and requirement [{}] is not a number",
                self.supplier_id, self.requirement_name
            ))
        })?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AssessmentError::validation(format!(
                "Submission value [{raw}] for supplier [{}] and requirement [{}] must not be negative",
                self.supplier_id, self.requirement_name
            )));
        }

        Ok(value)
    }
}
