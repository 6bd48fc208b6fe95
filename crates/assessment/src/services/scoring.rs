use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::ScoringConfig;
use crate::dto::{DimensionScores, RequirementScore, SupplierScores};
use crate::error::{AssessmentError, Result};
use crate::models::CalculationBase;

/// Weighted score of one calculation row, rounded half up to a whole number.
pub fn weighted_value(row: &CalculationBase) -> Result<i64> {
    let value = row.numeric_value()?;
    if value.is_zero() {
        return Ok(0);
    }
    if row.dimension_divisor == 0 {
        return Err(AssessmentError::validation(format!(
            "Dimension [{}] has a zero divisor for supplier [{}]",
            row.dimension_name, row.supplier_id
        )));
    }

    let weighted = value / Decimal::from(row.dimension_divisor)
        * row.selection_weight_pct
        * row.dimension_weight_pct
        / Decimal::ONE_HUNDRED;

    weighted
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| {
            AssessmentError::validation(format!(
                "Score for supplier [{}] and requirement [{}] is out of range",
                row.supplier_id, row.requirement_name
            ))
        })
}

#[derive(Debug)]
struct DimensionAccumulator {
    dimension_id: i32,
    name: String,
    requirement_scores: Vec<RequirementScore>,
}

#[derive(Debug)]
struct SupplierAccumulator {
    supplier_id: String,
    dimensions: Vec<DimensionAccumulator>,
}

/// Collects requirement scores per supplier and dimension during one scoring pass.
#[derive(Debug, Default)]
struct ScoreSheetBuilder {
    suppliers: Vec<SupplierAccumulator>,
    supplier_index: HashMap<String, usize>,
    dimension_index: HashMap<(String, i32), usize>,
}

impl ScoreSheetBuilder {
    fn push(&mut self, row: &CalculationBase, score: RequirementScore) {
        let supplier_slot = match self.supplier_index.get(&row.supplier_id) {
            Some(&slot) => slot,
            None => {
                self.suppliers.push(SupplierAccumulator {
                    supplier_id: row.supplier_id.clone(),
                    dimensions: Vec::new(),
                });
                let slot = self.suppliers.len() - 1;
                self.supplier_index.insert(row.supplier_id.clone(), slot);
                slot
            }
        };
        let supplier = &mut self.suppliers[supplier_slot];

        let key = (row.supplier_id.clone(), row.dimension_id);
        let dimension_slot = match self.dimension_index.get(&key) {
            Some(&slot) => slot,
            None => {
                supplier.dimensions.push(DimensionAccumulator {
                    dimension_id: row.dimension_id,
                    name: row.dimension_name.clone(),
                    requirement_scores: Vec::new(),
                });
                let slot = supplier.dimensions.len() - 1;
                self.dimension_index.insert(key, slot);
                slot
            }
        };

        supplier.dimensions[dimension_slot]
            .requirement_scores
            .push(score);
    }

    fn finish(self, primary_label: &str, alternate_label: &str) -> Result<Vec<SupplierScores>> {
        self.suppliers
            .into_iter()
            .map(|supplier| {
                let dimension_scores: Vec<DimensionScores> = supplier
                    .dimensions
                    .into_iter()
                    .map(|dimension| DimensionScores {
                        dimension_id: dimension.dimension_id,
                        name: dimension.name,
                        requirement_scores: dimension.requirement_scores,
                    })
                    .collect();

                let mut primary_total = 0i64;
                let mut alternate_total = 0i64;
                let mut has_alternate = false;
                for score in dimension_scores.iter().flat_map(|d| &d.requirement_scores) {
                    if score.criterion == primary_label {
                        primary_total = add_score(primary_total, score.score, &supplier.supplier_id)?;
                    } else if score.criterion == alternate_label {
                        alternate_total =
                            add_score(alternate_total, score.score, &supplier.supplier_id)?;
                        has_alternate = true;
                    }
                }

                let total = if has_alternate {
                    add_score(primary_total, alternate_total, &supplier.supplier_id)? / 2
                } else {
                    primary_total
                };

                Ok(SupplierScores {
                    supplier_id: supplier.supplier_id,
                    dimension_scores,
                    primary_total,
                    alternate_total,
                    total,
                })
            })
            .collect()
    }
}

fn add_score(total: i64, score: i64, supplier_id: &str) -> Result<i64> {
    total.checked_add(score).ok_or_else(|| {
        AssessmentError::validation(format!("Total score for supplier [{supplier_id}] is out of range"))
    })
}

/// Turns filtered calculation rows into per-supplier score sheets.
pub struct ScoringEngine<'a> {
    config: &'a ScoringConfig,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    /// Suppliers and dimensions come out in the order they first appear in `rows`.
    pub fn score(&self, rows: &[CalculationBase]) -> Result<Vec<SupplierScores>> {
        let mut builder = ScoreSheetBuilder::default();

        for row in rows {
            let score = RequirementScore {
                name: row.requirement_name.clone(),
                criterion: row.submission_type_name.clone(),
                value: row.numeric_value()?,
                score: weighted_value(row)?,
            };
            builder.push(row, score);
        }

        builder.finish(
            &self.config.primary_submission_type,
            &self.config.alternate_submission_type,
        )
    }
}
