//! Collaborators the scoring core reads from and writes to.
//!
//! The services only see these traits. [`postgres`] backs them with sqlx and
//! [`memory`] keeps everything in process.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Assessment, AssessmentResult, AssessmentTool, CalculationBase, Dimension, RequirementTaxon,
    Taxonomy,
};

pub mod memory;
pub mod postgres;

/// Read-only reference data: tools, dimensions and their taxonomies.
#[async_trait]
pub trait TaxonomyStore: Send + Sync {
    async fn find_tool(&self, tool_id: i32) -> Result<Option<AssessmentTool>>;

    /// Dimension with its submission types and valid values.
    async fn find_dimension(&self, dimension_id: i32) -> Result<Option<Dimension>>;

    async fn find_requirement_taxon(
        &self,
        requirement_id: i32,
        tool_id: i32,
    ) -> Result<Option<RequirementTaxon>>;

    /// Category tree of a dimension for a tool. Empty when nothing is configured.
    async fn taxonomy(&self, tool_id: i32, dimension_id: i32) -> Result<Taxonomy>;
}

#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn find_assessment(&self, assessment_id: i32) -> Result<Option<Assessment>>;

    /// Persists the whole aggregate and returns its id.
    async fn save_assessment(&self, assessment: &Assessment) -> Result<i32>;
}

#[async_trait]
pub trait CalculationBaseQuery: Send + Sync {
    async fn calculation_base(&self, assessment_id: i32) -> Result<Vec<CalculationBase>>;
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn find_result(
        &self,
        assessment_id: i32,
        supplier_organisation_id: &str,
    ) -> Result<Option<AssessmentResult>>;

    async fn save_result(&self, result: &AssessmentResult) -> Result<()>;
}
