use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A requirement a buyer can select, with the category path leading to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DimensionOption {
    pub name: String,
    pub requirement_id: i32,
    pub group_requirement: bool,
    pub description: Option<String>,
    pub groups: Vec<OptionGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OptionGroup {
    /// 1-based, outermost group first.
    pub level: u32,
    pub name: String,
    pub description: Option<String>,
}

/// Everything a buyer needs to configure one dimension of a tool
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DimensionDefinition {
    pub dimension_id: i32,
    pub name: String,
    pub weighting_range: WeightingRange,
    pub options: Vec<DimensionOption>,
    pub evaluation_criteria: Vec<CriterionDefinition>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct WeightingRange {
    pub min: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CriterionDefinition {
    pub criterion_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub selection_kind: String,
    /// Valid-value names, only for select kinds.
    pub options: Vec<String>,
}
