use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::AssessmentResult;
use crate::repository::ResultStore;

/// Repository for stored assessment scores
pub struct PgResultRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgResultRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> ResultStore for PgResultRepository<'a> {
    async fn find_result(
        &self,
        assessment_id: i32,
        supplier_organisation_id: &str,
    ) -> Result<Option<AssessmentResult>> {
        let result = sqlx::query_as::<_, AssessmentResult>(
            r#"
            SELECT assessment_result_id, assessment_id, supplier_organisation_id,
                   assessment_result_value, created_at, created_by, updated_at, updated_by
            FROM assessment_results
            WHERE assessment_id = $1 AND supplier_organisation_id = $2
            "#,
        )
        .bind(assessment_id)
        .bind(supplier_organisation_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Insert or update keyed on (assessment, supplier); the created pair of an
    /// existing row is never overwritten.
    async fn save_result(&self, result: &AssessmentResult) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO assessment_results (
                assessment_result_id, assessment_id, supplier_organisation_id,
                assessment_result_value, created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (assessment_id, supplier_organisation_id) DO UPDATE SET
                assessment_result_value = EXCLUDED.assessment_result_value,
                updated_at = COALESCE(EXCLUDED.updated_at, EXCLUDED.created_at),
                updated_by = COALESCE(EXCLUDED.updated_by, EXCLUDED.created_by)
            "#,
        )
        .bind(result.assessment_result_id)
        .bind(result.assessment_id)
        .bind(&result.supplier_organisation_id)
        .bind(result.assessment_result_value)
        .bind(result.timestamps.created_at)
        .bind(&result.timestamps.created_by)
        .bind(result.timestamps.updated_at)
        .bind(&result.timestamps.updated_by)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
