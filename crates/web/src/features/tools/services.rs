use assessment::{
    dto::DimensionDefinition,
    error::Result,
    repository::postgres::{PgAssessmentRepository, PgTaxonomyRepository},
    services::AssessmentDefinitionService,
};
use sqlx::PgPool;

/// Dimensions of a tool with their options and criteria
pub async fn dimensions_for_tool(pool: &PgPool, tool_id: i32) -> Result<Vec<DimensionDefinition>> {
    let taxonomy = PgTaxonomyRepository::new(pool);
    let assessments = PgAssessmentRepository::new(pool);
    AssessmentDefinitionService::new(&taxonomy, &assessments)
        .dimensions_for_tool(tool_id)
        .await
}
