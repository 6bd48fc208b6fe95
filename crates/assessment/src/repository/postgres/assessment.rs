use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};

use crate::error::{AssessmentError, Result};
use crate::models::{
    Assessment, AssessmentSelection, AssessmentSelectionDetail, DimensionWeighting,
    SelectionValue, Timestamps,
};
use crate::repository::AssessmentStore;

#[derive(FromRow)]
struct AssessmentRow {
    assessment_id: i32,
    assessment_tool_id: i32,
    assessment_name: Option<String>,
    status: String,
    buyer_organisation_id: String,
    #[sqlx(flatten)]
    timestamps: Timestamps,
}

#[derive(FromRow)]
struct WeightingRow {
    dimension_id: i32,
    dimension_name: String,
    weighting_pct: Decimal,
    #[sqlx(flatten)]
    timestamps: Timestamps,
}

#[derive(FromRow)]
struct SelectionRow {
    dimension_id: i32,
    requirement_id: i32,
    requirement_name: String,
    weighting_pct: Decimal,
    #[sqlx(flatten)]
    timestamps: Timestamps,
}

#[derive(FromRow)]
struct DetailRow {
    dimension_id: i32,
    requirement_id: i32,
    submission_type_code: String,
    valid_value_code: Option<String>,
    requirement_value: Option<Decimal>,
}

/// Loads and stores the assessment aggregate.
///
/// Saving rewrites the child rows of the assessment inside one transaction.
pub struct PgAssessmentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgAssessmentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn load_weightings(&self, assessment_id: i32) -> Result<Vec<DimensionWeighting>> {
        let rows = sqlx::query_as::<_, WeightingRow>(
            r#"
            SELECT adw.dimension_id, d.name AS dimension_name, adw.weighting_pct,
                   adw.created_at, adw.created_by, adw.updated_at, adw.updated_by
            FROM assessment_dimension_weightings adw
            INNER JOIN dimensions d ON d.dimension_id = adw.dimension_id
            WHERE adw.assessment_id = $1
            ORDER BY adw.display_order
            "#,
        )
        .bind(assessment_id)
        .fetch_all(self.pool)
        .await?;

        let codes = sqlx::query_as::<_, (i32, String)>(
            r#"
            SELECT dimension_id, submission_type_code
            FROM assessment_dimension_submission_types
            WHERE assessment_id = $1
            ORDER BY display_order
            "#,
        )
        .bind(assessment_id)
        .fetch_all(self.pool)
        .await?;

        let mut codes_by_dimension: HashMap<i32, Vec<String>> = HashMap::new();
        for (dimension_id, code) in codes {
            codes_by_dimension.entry(dimension_id).or_default().push(code);
        }

        Ok(rows
            .into_iter()
            .map(|row| DimensionWeighting {
                dimension_id: row.dimension_id,
                dimension_name: row.dimension_name,
                weighting_percentage: row.weighting_pct,
                submission_types: codes_by_dimension.remove(&row.dimension_id).unwrap_or_default(),
                timestamps: row.timestamps,
            })
            .collect())
    }

    async fn load_selections(&self, assessment_id: i32) -> Result<Vec<AssessmentSelection>> {
        let rows = sqlx::query_as::<_, SelectionRow>(
            r#"
            SELECT asel.dimension_id, asel.requirement_id, r.name AS requirement_name,
                   asel.weighting_pct, asel.created_at, asel.created_by,
                   asel.updated_at, asel.updated_by
            FROM assessment_selections asel
            INNER JOIN requirements r ON r.requirement_id = asel.requirement_id
            WHERE asel.assessment_id = $1
            ORDER BY asel.display_order
            "#,
        )
        .bind(assessment_id)
        .fetch_all(self.pool)
        .await?;

        let details = sqlx::query_as::<_, DetailRow>(
            r#"
            SELECT dimension_id, requirement_id, submission_type_code,
                   valid_value_code, requirement_value
            FROM assessment_selection_details
            WHERE assessment_id = $1
            ORDER BY display_order
            "#,
        )
        .bind(assessment_id)
        .fetch_all(self.pool)
        .await?;

        let mut details_by_selection: HashMap<(i32, i32), Vec<AssessmentSelectionDetail>> =
            HashMap::new();
        for detail in details {
            let value = match (detail.valid_value_code, detail.requirement_value) {
                (Some(code), _) => SelectionValue::ValidValue(code),
                (None, Some(number)) => SelectionValue::Numeric(number),
                (None, None) => {
                    return Err(AssessmentError::validation(format!(
                        "Assessment [{assessment_id}] has an empty value for requirement [{}]",
                        detail.requirement_id
                    )));
                }
            };
            details_by_selection
                .entry((detail.dimension_id, detail.requirement_id))
                .or_default()
                .push(AssessmentSelectionDetail {
                    submission_type_code: detail.submission_type_code,
                    value,
                });
        }

        Ok(rows
            .into_iter()
            .map(|row| AssessmentSelection {
                dimension_id: row.dimension_id,
                requirement_id: row.requirement_id,
                requirement_name: row.requirement_name,
                weighting_percentage: row.weighting_pct,
                details: details_by_selection
                    .remove(&(row.dimension_id, row.requirement_id))
                    .unwrap_or_default(),
                timestamps: row.timestamps,
            })
            .collect())
    }

    async fn insert_header(tx: &mut Transaction<'_, Postgres>, assessment: &Assessment) -> Result<i32> {
        let assessment_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO assessments (
                assessment_tool_id, assessment_name, status, buyer_organisation_id,
                created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING assessment_id
            "#,
        )
        .bind(assessment.tool_id)
        .bind(&assessment.assessment_name)
        .bind(assessment.status.as_str())
        .bind(&assessment.buyer_organisation_id)
        .bind(assessment.timestamps.created_at)
        .bind(&assessment.timestamps.created_by)
        .bind(assessment.timestamps.updated_at)
        .bind(&assessment.timestamps.updated_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(assessment_id)
    }

    async fn update_header(
        tx: &mut Transaction<'_, Postgres>,
        assessment_id: i32,
        assessment: &Assessment,
    ) -> Result<()> {
        let updated = sqlx::query(
            r#"
            UPDATE assessments
            SET assessment_name = $2, status = $3, buyer_organisation_id = $4,
                updated_at = $5, updated_by = $6
            WHERE assessment_id = $1
            "#,
        )
        .bind(assessment_id)
        .bind(&assessment.assessment_name)
        .bind(assessment.status.as_str())
        .bind(&assessment.buyer_organisation_id)
        .bind(assessment.timestamps.updated_at)
        .bind(&assessment.timestamps.updated_by)
        .execute(&mut **tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AssessmentError::not_found(format!(
                "Assessment [{assessment_id}] not found"
            )));
        }

        // Details and submission types go with their parents.
        sqlx::query("DELETE FROM assessment_selections WHERE assessment_id = $1")
            .bind(assessment_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM assessment_dimension_weightings WHERE assessment_id = $1")
            .bind(assessment_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    async fn insert_children(
        tx: &mut Transaction<'_, Postgres>,
        assessment_id: i32,
        assessment: &Assessment,
    ) -> Result<()> {
        if !assessment.dimension_weightings.is_empty() {
            let mut query = QueryBuilder::<Postgres>::new(
                "INSERT INTO assessment_dimension_weightings (assessment_id, dimension_id, weighting_pct, display_order, created_at, created_by, updated_at, updated_by) ",
            );
            query.push_values(
                assessment.dimension_weightings.iter().enumerate(),
                |mut row, (order, weighting)| {
                    row.push_bind(assessment_id)
                        .push_bind(weighting.dimension_id)
                        .push_bind(weighting.weighting_percentage)
                        .push_bind(order as i32)
                        .push_bind(weighting.timestamps.created_at)
                        .push_bind(&weighting.timestamps.created_by)
                        .push_bind(weighting.timestamps.updated_at)
                        .push_bind(&weighting.timestamps.updated_by);
                },
            );
            query.build().execute(&mut **tx).await?;
        }

        let submission_types: Vec<(i32, usize, &String)> = assessment
            .dimension_weightings
            .iter()
            .flat_map(|weighting| {
                weighting
                    .submission_types
                    .iter()
                    .enumerate()
                    .map(move |(order, code)| (weighting.dimension_id, order, code))
            })
            .collect();
        if !submission_types.is_empty() {
            let mut query = QueryBuilder::<Postgres>::new(
                "INSERT INTO assessment_dimension_submission_types (assessment_id, dimension_id, submission_type_code, display_order) ",
            );
            query.push_values(submission_types, |mut row, (dimension_id, order, code)| {
                row.push_bind(assessment_id)
                    .push_bind(dimension_id)
                    .push_bind(code)
                    .push_bind(order as i32);
            });
            query.build().execute(&mut **tx).await?;
        }

        if !assessment.selections.is_empty() {
            let mut query = QueryBuilder::<Postgres>::new(
                "INSERT INTO assessment_selections (assessment_id, dimension_id, requirement_id, weighting_pct, display_order, created_at, created_by, updated_at, updated_by) ",
            );
            query.push_values(
                assessment.selections.iter().enumerate(),
                |mut row, (order, selection)| {
                    row.push_bind(assessment_id)
                        .push_bind(selection.dimension_id)
                        .push_bind(selection.requirement_id)
                        .push_bind(selection.weighting_percentage)
                        .push_bind(order as i32)
                        .push_bind(selection.timestamps.created_at)
                        .push_bind(&selection.timestamps.created_by)
                        .push_bind(selection.timestamps.updated_at)
                        .push_bind(&selection.timestamps.updated_by);
                },
            );
            query.build().execute(&mut **tx).await?;
        }

        let details: Vec<(&AssessmentSelection, usize, &AssessmentSelectionDetail)> = assessment
            .selections
            .iter()
            .flat_map(|selection| {
                selection
                    .details
                    .iter()
                    .enumerate()
                    .map(move |(order, detail)| (selection, order, detail))
            })
            .collect();
        if !details.is_empty() {
            let mut query = QueryBuilder::<Postgres>::new(
                "INSERT INTO assessment_selection_details (assessment_id, dimension_id, requirement_id, submission_type_code, valid_value_code, requirement_value, display_order) ",
            );
            query.push_values(details, |mut row, (selection, order, detail)| {
                let (code, number) = match &detail.value {
                    SelectionValue::ValidValue(code) => (Some(code.as_str()), None),
                    SelectionValue::Numeric(number) => (None, Some(*number)),
                };
                row.push_bind(assessment_id)
                    .push_bind(selection.dimension_id)
                    .push_bind(selection.requirement_id)
                    .push_bind(&detail.submission_type_code)
                    .push_bind(code)
                    .push_bind(number)
                    .push_bind(order as i32);
            });
            query.build().execute(&mut **tx).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl<'a> AssessmentStore for PgAssessmentRepository<'a> {
    async fn find_assessment(&self, assessment_id: i32) -> Result<Option<Assessment>> {
        let row = sqlx::query_as::<_, AssessmentRow>(
            r#"
            SELECT assessment_id, assessment_tool_id, assessment_name, status,
                   buyer_organisation_id, created_at, created_by, updated_at, updated_by
            FROM assessments
            WHERE assessment_id = $1
            "#,
        )
        .bind(assessment_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(Assessment {
            assessment_id: Some(row.assessment_id),
            tool_id: row.assessment_tool_id,
            assessment_name: row.assessment_name,
            status: row.status.parse()?,
            buyer_organisation_id: row.buyer_organisation_id,
            timestamps: row.timestamps,
            dimension_weightings: self.load_weightings(assessment_id).await?,
            selections: self.load_selections(assessment_id).await?,
        }))
    }

    async fn save_assessment(&self, assessment: &Assessment) -> Result<i32> {
        let mut tx = self.pool.begin().await?;

        let assessment_id = match assessment.assessment_id {
            Some(assessment_id) => {
                Self::update_header(&mut tx, assessment_id, assessment).await?;
                assessment_id
            }
            None => Self::insert_header(&mut tx, assessment).await?,
        };

        Self::insert_children(&mut tx, assessment_id, assessment).await?;

        tx.commit().await?;

        Ok(assessment_id)
    }
}
