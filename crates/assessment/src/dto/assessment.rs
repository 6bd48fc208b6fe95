use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::scores::SupplierScores;
use crate::models::AssessmentStatus;

/// Request payload for starting a new assessment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAssessmentRequest {
    #[validate(range(min = 1, message = "Tool id must be a positive integer"))]
    pub tool_id: i32,

    #[validate(length(max = 255, message = "Assessment name must be at most 255 characters"))]
    pub assessment_name: Option<String>,

    #[validate(length(min = 1, message = "Buyer organisation id must not be empty"))]
    pub buyer_organisation_id: String,

    #[serde(default)]
    #[validate(nested)]
    pub dimension_requirements: Vec<DimensionRequirement>,
}

/// Weighting, enabled criteria and requirement selections for one dimension
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct DimensionRequirement {
    pub dimension_id: Option<i32>,

    pub name: Option<String>,

    #[validate(range(min = 0, max = 100, message = "Weighting must be between 0 and 100"))]
    pub weighting: Option<i32>,

    /// Submission-type codes enabled for the dimension.
    #[serde(default)]
    pub included_criteria: Vec<CriterionRef>,

    #[validate(nested)]
    pub requirements: Option<Vec<RequirementRequest>>,

    /// Drop existing selections of the dimension that are absent from `requirements`.
    pub overwrite_requirements: Option<bool>,
}

impl DimensionRequirement {
    pub fn weighting_or_zero(&self) -> Decimal {
        Decimal::from(self.weighting.unwrap_or(0))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CriterionRef {
    pub criterion_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RequirementRequest {
    pub requirement_id: i32,

    pub name: Option<String>,

    #[validate(range(min = 0, max = 100, message = "Weighting must be between 0 and 100"))]
    pub weighting: Option<i32>,

    #[serde(default)]
    pub values: Vec<CriterionValue>,
}

impl RequirementRequest {
    pub fn weighting_or_zero(&self) -> Decimal {
        Decimal::from(self.weighting.unwrap_or(0))
    }
}

/// A buyer's answer for one submission type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CriterionValue {
    pub criterion_id: String,
    pub value: String,
}

/// Id returned by every definition mutation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct AssessmentCreated {
    pub assessment_id: i32,
}

/// Stored assessment definition, with values decoded for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssessmentView {
    pub assessment_id: i32,
    pub tool_id: i32,
    pub assessment_name: Option<String>,
    pub status: AssessmentStatus,
    pub buyer_organisation_id: String,
    pub dimension_requirements: Vec<DimensionRequirementView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<SupplierScores>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DimensionRequirementView {
    pub dimension_id: i32,
    pub name: String,
    pub weighting: Decimal,
    pub included_criteria: Vec<CriterionRef>,
    pub requirements: Vec<RequirementView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequirementView {
    pub requirement_id: i32,
    pub name: String,
    pub weighting: Decimal,
    pub values: Vec<CriterionValue>,
}
