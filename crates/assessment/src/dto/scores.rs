use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Score breakdown and total for one supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupplierScores {
    pub supplier_id: String,
    pub dimension_scores: Vec<DimensionScores>,
    pub primary_total: i64,
    pub alternate_total: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DimensionScores {
    pub dimension_id: i32,
    pub name: String,
    pub requirement_scores: Vec<RequirementScore>,
}

impl DimensionScores {
    pub fn score(&self) -> i64 {
        self.requirement_scores.iter().map(|rs| rs.score).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RequirementScore {
    pub name: String,
    /// Submission-type label the score was recorded under.
    pub criterion: String,
    pub value: Decimal,
    pub score: i64,
}
