use tracing::{debug, info};

use crate::config::ScoringConfig;
use crate::dto::SupplierScores;
use crate::error::Result;
use crate::repository::{CalculationBaseQuery, ResultStore};
use crate::services::elimination::EliminationFilter;
use crate::services::results::ResultPersister;
use crate::services::scoring::ScoringEngine;

/// Runs a full scoring pass for one assessment: load rows, apply the gates, score and
/// store one result per supplier.
///
/// Callers must not run two passes for the same assessment concurrently.
pub struct AssessmentScoringService<'a, C: CalculationBaseQuery, R: ResultStore> {
    rows: &'a C,
    results: &'a R,
    config: &'a ScoringConfig,
}

impl<'a, C: CalculationBaseQuery, R: ResultStore> AssessmentScoringService<'a, C, R> {
    pub fn new(rows: &'a C, results: &'a R, config: &'a ScoringConfig) -> Self {
        Self {
            rows,
            results,
            config,
        }
    }

    pub async fn calculate(&self, assessment_id: i32, principal: &str) -> Result<Vec<SupplierScores>> {
        let rows = self.rows.calculation_base(assessment_id).await?;
        let total_rows = rows.len();

        let retained = EliminationFilter::new(&self.config.gate_dimensions).apply(rows)?;
        debug!(
            assessment_id,
            total_rows,
            retained_rows = retained.len(),
            "Gate dimensions applied"
        );

        let scores = ScoringEngine::new(self.config).score(&retained)?;

        ResultPersister::new(self.results)
            .persist(assessment_id, &scores, principal)
            .await?;

        info!(
            assessment_id,
            suppliers = scores.len(),
            "Assessment scores calculated"
        );

        Ok(scores)
    }
}
