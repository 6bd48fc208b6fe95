use assessment::dto::{
    AssessmentCreated, AssessmentView, CreateAssessmentRequest, DimensionRequirement,
    RequirementRequest, SupplierScores,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::principal::Principal;
use crate::state::AppState;

use super::services;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetAssessmentParams {
    /// Calculate and attach supplier scores.
    #[serde(default)]
    pub scores: bool,
}

#[utoipa::path(
    post,
    path = "/api/assessments",
    request_body = CreateAssessmentRequest,
    params(
        ("x-principal" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 201, description = "Assessment created", body = AssessmentCreated),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Tool or dimension not found")
    ),
    tag = "assessments"
)]
pub async fn create_assessment(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Json(req): Json<CreateAssessmentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let assessment_id = services::create_assessment(state.db.pool(), &req, &principal).await?;

    Ok((StatusCode::CREATED, Json(AssessmentCreated { assessment_id })).into_response())
}

#[utoipa::path(
    get,
    path = "/api/assessments/{assessment_id}",
    params(
        ("assessment_id" = i32, Path, description = "Assessment id"),
        GetAssessmentParams
    ),
    responses(
        (status = 200, description = "Assessment found", body = AssessmentView),
        (status = 400, description = "Scores requested without x-principal"),
        (status = 404, description = "Assessment not found")
    ),
    tag = "assessments"
)]
pub async fn get_assessment(
    State(state): State<AppState>,
    Path(assessment_id): Path<i32>,
    Query(params): Query<GetAssessmentParams>,
    principal: Option<Principal>,
) -> Result<Response, WebError> {
    let scores_for = match (params.scores, &principal) {
        (false, _) => None,
        (true, Some(Principal(principal))) => Some(principal.as_str()),
        (true, None) => {
            return Err(WebError::BadRequest(
                "Scores can only be calculated with an x-principal header".to_string(),
            ));
        }
    };

    let view =
        services::get_assessment(state.db.pool(), &state.scoring, assessment_id, scores_for).await?;

    Ok(Json(view).into_response())
}

#[utoipa::path(
    put,
    path = "/api/assessments/{assessment_id}/dimensions",
    request_body = Vec<DimensionRequirement>,
    params(
        ("assessment_id" = i32, Path, description = "Assessment id"),
        ("x-principal" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 204, description = "Dimensions updated"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Assessment or dimension not found")
    ),
    tag = "assessments"
)]
pub async fn update_dimensions(
    State(state): State<AppState>,
    Path(assessment_id): Path<i32>,
    Principal(principal): Principal,
    Json(req): Json<Vec<DimensionRequirement>>,
) -> Result<Response, WebError> {
    for dimension_requirement in &req {
        dimension_requirement.validate()?;
    }

    services::update_dimensions(state.db.pool(), assessment_id, &req, &principal).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    put,
    path = "/api/assessments/{assessment_id}/dimensions/{dimension_id}",
    request_body = DimensionRequirement,
    params(
        ("assessment_id" = i32, Path, description = "Assessment id"),
        ("dimension_id" = i32, Path, description = "Dimension id"),
        ("x-principal" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Dimension updated", body = i32),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Assessment or dimension not found")
    ),
    tag = "assessments"
)]
pub async fn update_dimension(
    State(state): State<AppState>,
    Path((assessment_id, dimension_id)): Path<(i32, i32)>,
    Principal(principal): Principal,
    Json(req): Json<DimensionRequirement>,
) -> Result<Response, WebError> {
    req.validate()?;

    let dimension_id =
        services::update_dimension(state.db.pool(), assessment_id, dimension_id, &req, &principal)
            .await?;

    Ok(Json(dimension_id).into_response())
}

#[utoipa::path(
    put,
    path = "/api/assessments/{assessment_id}/dimensions/{dimension_id}/requirements/{requirement_id}",
    request_body = RequirementRequest,
    params(
        ("assessment_id" = i32, Path, description = "Assessment id"),
        ("dimension_id" = i32, Path, description = "Dimension id"),
        ("requirement_id" = i32, Path, description = "Requirement id"),
        ("x-principal" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Requirement updated", body = i32),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Assessment, dimension or requirement not found")
    ),
    tag = "assessments"
)]
pub async fn update_requirement(
    State(state): State<AppState>,
    Path((assessment_id, dimension_id, requirement_id)): Path<(i32, i32, i32)>,
    Principal(principal): Principal,
    Json(req): Json<RequirementRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    if req.requirement_id != requirement_id {
        return Err(WebError::BadRequest(format!(
            "Requirement-id [{}] does not match requirement-id [{}]",
            req.requirement_id, requirement_id
        )));
    }

    let requirement_id =
        services::update_requirement(state.db.pool(), assessment_id, dimension_id, &req, &principal)
            .await?;

    Ok(Json(requirement_id).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/assessments/{assessment_id}/dimensions/{dimension_id}/requirements/{requirement_id}",
    params(
        ("assessment_id" = i32, Path, description = "Assessment id"),
        ("dimension_id" = i32, Path, description = "Dimension id"),
        ("requirement_id" = i32, Path, description = "Requirement id"),
        ("x-principal" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 204, description = "Requirement removed"),
        (status = 404, description = "Assessment or selection not found")
    ),
    tag = "assessments"
)]
pub async fn delete_requirement(
    State(state): State<AppState>,
    Path((assessment_id, dimension_id, requirement_id)): Path<(i32, i32, i32)>,
    Principal(principal): Principal,
) -> Result<Response, WebError> {
    services::delete_requirement(
        state.db.pool(),
        assessment_id,
        dimension_id,
        requirement_id,
        &principal,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/assessments/{assessment_id}/scores",
    params(
        ("assessment_id" = i32, Path, description = "Assessment id"),
        ("x-principal" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Scores calculated and stored", body = Vec<SupplierScores>),
        (status = 404, description = "Assessment not found")
    ),
    tag = "assessments"
)]
pub async fn calculate_scores(
    State(state): State<AppState>,
    Path(assessment_id): Path<i32>,
    Principal(principal): Principal,
) -> Result<Response, WebError> {
    let scores =
        services::calculate_scores(state.db.pool(), &state.scoring, assessment_id, &principal)
            .await?;

    Ok(Json(scores).into_response())
}
