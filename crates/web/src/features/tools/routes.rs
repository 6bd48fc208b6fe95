use axum::{Router, routing::get};

use super::handlers::get_dimensions;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/:tool_id/dimensions", get(get_dimensions))
}
