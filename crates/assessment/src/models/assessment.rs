use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AssessmentError;
use crate::models::Timestamps;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentStatus {
    Active,
    Complete,
}

impl AssessmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssessmentStatus {
    type Err = AssessmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "complete" => Ok(Self::Complete),
            other => Err(AssessmentError::validation(format!(
                "Assessment status [{other}] not recognised"
            ))),
        }
    }
}

/// A buyer's assessment and everything hanging off it.
///
/// The aggregate is loaded whole, mutated in memory and saved whole, so a rejected
/// mutation never reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// `None` until the store assigns one.
    pub assessment_id: Option<i32>,
    pub tool_id: i32,
    pub assessment_name: Option<String>,
    pub status: AssessmentStatus,
    pub buyer_organisation_id: String,
    pub timestamps: Timestamps,
    pub dimension_weightings: Vec<DimensionWeighting>,
    pub selections: Vec<AssessmentSelection>,
}

impl Assessment {
    pub fn new(
        tool_id: i32,
        assessment_name: Option<String>,
        buyer_organisation_id: impl Into<String>,
        principal: &str,
    ) -> Self {
        Self {
            assessment_id: None,
            tool_id,
            assessment_name,
            status: AssessmentStatus::Active,
            buyer_organisation_id: buyer_organisation_id.into(),
            timestamps: Timestamps::created_by(principal),
            dimension_weightings: Vec::new(),
            selections: Vec::new(),
        }
    }

    pub fn dimension_weighting(&self, dimension_id: i32) -> Option<&DimensionWeighting> {
        self.dimension_weightings
            .iter()
            .find(|dw| dw.dimension_id == dimension_id)
    }

    pub fn dimension_weighting_mut(&mut self, dimension_id: i32) -> Option<&mut DimensionWeighting> {
        self.dimension_weightings
            .iter_mut()
            .find(|dw| dw.dimension_id == dimension_id)
    }

    pub fn selection(&self, dimension_id: i32, requirement_id: i32) -> Option<&AssessmentSelection> {
        self.selections
            .iter()
            .find(|s| s.dimension_id == dimension_id && s.requirement_id == requirement_id)
    }

    pub fn selection_mut(
        &mut self,
        dimension_id: i32,
        requirement_id: i32,
    ) -> Option<&mut AssessmentSelection> {
        self.selections
            .iter_mut()
            .find(|s| s.dimension_id == dimension_id && s.requirement_id == requirement_id)
    }

    pub fn selections_for(&self, dimension_id: i32) -> impl Iterator<Item = &AssessmentSelection> {
        self.selections
            .iter()
            .filter(move |s| s.dimension_id == dimension_id)
    }

    /// Removes one selection, returning whether it existed.
    pub fn remove_selection(&mut self, dimension_id: i32, requirement_id: i32) -> bool {
        let before = self.selections.len();
        self.selections
            .retain(|s| !(s.dimension_id == dimension_id && s.requirement_id == requirement_id));
        self.selections.len() != before
    }

    pub fn total_weighting(&self) -> Decimal {
        self.dimension_weightings
            .iter()
            .map(|dw| dw.weighting_percentage)
            .sum()
    }

    pub fn touch(&mut self, principal: &str) {
        self.timestamps.touch(principal);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionWeighting {
    pub dimension_id: i32,
    pub dimension_name: String,
    pub weighting_percentage: Decimal,
    /// Codes of the submission types enabled for this dimension.
    pub submission_types: Vec<String>,
    pub timestamps: Timestamps,
}

impl DimensionWeighting {
    pub fn new(dimension_id: i32, dimension_name: impl Into<String>, principal: &str) -> Self {
        Self {
            dimension_id,
            dimension_name: dimension_name.into(),
            weighting_percentage: Decimal::ZERO,
            submission_types: Vec::new(),
            timestamps: Timestamps::created_by(principal),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSelection {
    pub dimension_id: i32,
    pub requirement_id: i32,
    pub requirement_name: String,
    pub weighting_percentage: Decimal,
    pub details: Vec<AssessmentSelectionDetail>,
    pub timestamps: Timestamps,
}

impl AssessmentSelection {
    pub fn new(
        dimension_id: i32,
        requirement_id: i32,
        requirement_name: impl Into<String>,
        principal: &str,
    ) -> Self {
        Self {
            dimension_id,
            requirement_id,
            requirement_name: requirement_name.into(),
            weighting_percentage: Decimal::ZERO,
            details: Vec::new(),
            timestamps: Timestamps::created_by(principal),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSelectionDetail {
    pub submission_type_code: String,
    pub value: SelectionValue,
}

/// One typed answer for a submission type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SelectionValue {
    /// Code of a dimension valid value.
    ValidValue(String),
    Numeric(Decimal),
}
