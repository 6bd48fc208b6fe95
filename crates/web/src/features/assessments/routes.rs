use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{
    calculate_scores, create_assessment, delete_requirement, get_assessment, update_dimension,
    update_dimensions, update_requirement,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assessment))
        .route("/:assessment_id", get(get_assessment))
        .route("/:assessment_id/dimensions", put(update_dimensions))
        .route("/:assessment_id/dimensions/:dimension_id", put(update_dimension))
        .route(
            "/:assessment_id/dimensions/:dimension_id/requirements/:requirement_id",
            put(update_requirement).delete(delete_requirement),
        )
        .route("/:assessment_id/scores", post(calculate_scores))
}
