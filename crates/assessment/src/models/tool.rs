use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An assessment tool bounds which dimensions an assessment may weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentTool {
    pub tool_id: i32,
    pub external_tool_id: String,
    pub name: String,
    pub dimensions: Vec<ToolDimension>,
}

impl AssessmentTool {
    pub fn dimension(&self, dimension_id: i32) -> Option<&ToolDimension> {
        self.dimensions
            .iter()
            .find(|dimension| dimension.dimension_id == dimension_id)
    }
}

/// A dimension legal for a tool, with the weighting range a buyer may choose from.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ToolDimension {
    pub dimension_id: i32,
    pub name: String,
    pub min_weighting_pct: Decimal,
    pub max_weighting_pct: Decimal,
}

impl ToolDimension {
    pub fn allows_weighting(&self, weighting: Decimal) -> bool {
        weighting >= self.min_weighting_pct && weighting <= self.max_weighting_pct
    }
}
