use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Timestamps;

/// Stored total score of one supplier against one assessment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AssessmentResult {
    pub assessment_result_id: Uuid,
    pub assessment_id: i32,
    pub supplier_organisation_id: String,
    pub assessment_result_value: Decimal,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl AssessmentResult {
    pub fn new(
        assessment_id: i32,
        supplier_organisation_id: impl Into<String>,
        value: Decimal,
        principal: &str,
    ) -> Self {
        Self {
            assessment_result_id: Uuid::new_v4(),
            assessment_id,
            supplier_organisation_id: supplier_organisation_id.into(),
            assessment_result_value: value,
            timestamps: Timestamps::created_by(principal),
        }
    }

    pub fn update_value(&mut self, value: Decimal, principal: &str) {
        self.assessment_result_value = value;
        self.timestamps.touch(principal);
    }
}
