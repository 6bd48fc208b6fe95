use assessment::dto::DimensionDefinition;
use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/tools/{tool_id}/dimensions",
    params(
        ("tool_id" = i32, Path, description = "Assessment tool id")
    ),
    responses(
        (status = 200, description = "Dimensions of the tool", body = Vec<DimensionDefinition>),
        (status = 404, description = "Tool not found")
    ),
    tag = "tools"
)]
pub async fn get_dimensions(
    State(state): State<AppState>,
    Path(tool_id): Path<i32>,
) -> Result<Response, WebError> {
    let dimensions = services::dimensions_for_tool(state.db.pool(), tool_id).await?;

    Ok(Json(dimensions).into_response())
}
