use std::sync::Arc;

use assessment::{Database, config::ScoringConfig};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub scoring: Arc<ScoringConfig>,
}

impl AppState {
    pub fn new(db: Database, scoring: ScoringConfig) -> Self {
        Self {
            db,
            scoring: Arc::new(scoring),
        }
    }
}
