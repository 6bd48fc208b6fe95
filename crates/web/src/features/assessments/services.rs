use assessment::{
    config::ScoringConfig,
    dto::{
        AssessmentView, CreateAssessmentRequest, DimensionRequirement, RequirementRequest,
        SupplierScores,
    },
    error::{AssessmentError, Result},
    repository::{
        AssessmentStore,
        postgres::{
            PgAssessmentRepository, PgCalculationBaseRepository, PgResultRepository,
            PgTaxonomyRepository,
        },
    },
    services::{AssessmentDefinitionService, AssessmentScoringService},
};
use sqlx::PgPool;

/// Create an assessment and return its id
pub async fn create_assessment(
    pool: &PgPool,
    request: &CreateAssessmentRequest,
    principal: &str,
) -> Result<i32> {
    let taxonomy = PgTaxonomyRepository::new(pool);
    let assessments = PgAssessmentRepository::new(pool);
    AssessmentDefinitionService::new(&taxonomy, &assessments)
        .create_assessment(request, principal)
        .await
}

/// Read an assessment back, optionally scoring it first
pub async fn get_assessment(
    pool: &PgPool,
    scoring: &ScoringConfig,
    assessment_id: i32,
    scores_for: Option<&str>,
) -> Result<AssessmentView> {
    let taxonomy = PgTaxonomyRepository::new(pool);
    let assessments = PgAssessmentRepository::new(pool);
    let mut view = AssessmentDefinitionService::new(&taxonomy, &assessments)
        .get_assessment(assessment_id)
        .await?;

    if let Some(principal) = scores_for {
        view.scores = Some(calculate_scores(pool, scoring, assessment_id, principal).await?);
    }

    Ok(view)
}

pub async fn update_dimensions(
    pool: &PgPool,
    assessment_id: i32,
    dimension_requirements: &[DimensionRequirement],
    principal: &str,
) -> Result<()> {
    let taxonomy = PgTaxonomyRepository::new(pool);
    let assessments = PgAssessmentRepository::new(pool);
    AssessmentDefinitionService::new(&taxonomy, &assessments)
        .update_dimensions(assessment_id, dimension_requirements, principal)
        .await
}

pub async fn update_dimension(
    pool: &PgPool,
    assessment_id: i32,
    dimension_id: i32,
    dimension_requirement: &DimensionRequirement,
    principal: &str,
) -> Result<i32> {
    let taxonomy = PgTaxonomyRepository::new(pool);
    let assessments = PgAssessmentRepository::new(pool);
    AssessmentDefinitionService::new(&taxonomy, &assessments)
        .update_dimension(assessment_id, dimension_id, dimension_requirement, principal)
        .await
}

pub async fn update_requirement(
    pool: &PgPool,
    assessment_id: i32,
    dimension_id: i32,
    requirement: &RequirementRequest,
    principal: &str,
) -> Result<i32> {
    let taxonomy = PgTaxonomyRepository::new(pool);
    let assessments = PgAssessmentRepository::new(pool);
    AssessmentDefinitionService::new(&taxonomy, &assessments)
        .update_requirement(assessment_id, dimension_id, requirement, principal)
        .await
}

pub async fn delete_requirement(
    pool: &PgPool,
    assessment_id: i32,
    dimension_id: i32,
    requirement_id: i32,
    principal: &str,
) -> Result<()> {
    let taxonomy = PgTaxonomyRepository::new(pool);
    let assessments = PgAssessmentRepository::new(pool);
    AssessmentDefinitionService::new(&taxonomy, &assessments)
        .delete_requirement(assessment_id, dimension_id, requirement_id, principal)
        .await
}

/// Score every supplier against an assessment and store the totals
pub async fn calculate_scores(
    pool: &PgPool,
    scoring: &ScoringConfig,
    assessment_id: i32,
    principal: &str,
) -> Result<Vec<SupplierScores>> {
    if PgAssessmentRepository::new(pool)
        .find_assessment(assessment_id)
        .await?
        .is_none()
    {
        return Err(AssessmentError::not_found(format!(
            "Assessment [{assessment_id}] not found"
        )));
    }

    let rows = PgCalculationBaseRepository::new(pool);
    let results = PgResultRepository::new(pool);
    AssessmentScoringService::new(&rows, &results, scoring)
        .calculate(assessment_id, principal)
        .await
}
