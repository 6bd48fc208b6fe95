use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::CalculationBase;
use crate::repository::CalculationBaseQuery;

/// Reads the `calculation_base` view
pub struct PgCalculationBaseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgCalculationBaseRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> CalculationBaseQuery for PgCalculationBaseRepository<'a> {
    async fn calculation_base(&self, assessment_id: i32) -> Result<Vec<CalculationBase>> {
        let rows = sqlx::query_as::<_, CalculationBase>(
            r#"
            SELECT assessment_id, supplier_id, dimension_id, dimension_name, requirement_name,
                   submission_type_name, submission_value, dimension_divisor,
                   asel_weighting_pct, adw_weighting_pct
            FROM calculation_base
            WHERE assessment_id = $1
            ORDER BY supplier_id, dimension_id, requirement_name, submission_type_name
            "#,
        )
        .bind(assessment_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
