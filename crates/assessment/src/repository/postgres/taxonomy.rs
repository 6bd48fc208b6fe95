use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::error::Result;
use crate::models::{
    AssessmentTool, Dimension, DimensionSubmissionType, RequirementTaxon, SelectionKind, TaxonId,
    Taxonomy, ToolDimension, ValidValue,
};
use crate::repository::TaxonomyStore;

#[derive(FromRow)]
struct ToolRow {
    assessment_tool_id: i32,
    external_assessment_tool_id: String,
    name: String,
}

#[derive(FromRow)]
struct DimensionRow {
    dimension_id: i32,
    name: String,
}

#[derive(FromRow)]
struct SubmissionTypeRow {
    submission_type_code: String,
    name: String,
    selection_type: String,
}

#[derive(FromRow)]
struct TaxonRow {
    assessment_taxon_id: i32,
    parent_taxon_id: Option<i32>,
    name: String,
    description: Option<String>,
}

#[derive(FromRow)]
struct RequirementLeafRow {
    assessment_taxon_id: i32,
    requirement_id: i32,
    name: String,
    is_group_requirement: bool,
}

/// Reads tools, dimensions and taxonomies
pub struct PgTaxonomyRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgTaxonomyRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn tool_dimensions(&self, tool_id: i32) -> Result<Vec<ToolDimension>> {
        let dimensions = sqlx::query_as::<_, ToolDimension>(
            r#"
            SELECT atd.dimension_id, d.name, atd.min_weighting_pct, atd.max_weighting_pct
            FROM assessment_tool_dimensions atd
            INNER JOIN dimensions d ON d.dimension_id = atd.dimension_id
            WHERE atd.assessment_tool_id = $1
            ORDER BY atd.dimension_id
            "#,
        )
        .bind(tool_id)
        .fetch_all(self.pool)
        .await?;

        Ok(dimensions)
    }
}

#[async_trait]
impl<'a> TaxonomyStore for PgTaxonomyRepository<'a> {
    async fn find_tool(&self, tool_id: i32) -> Result<Option<AssessmentTool>> {
        let row = sqlx::query_as::<_, ToolRow>(
            r#"
            SELECT assessment_tool_id, external_assessment_tool_id, name
            FROM assessment_tools
            WHERE assessment_tool_id = $1
            "#,
        )
        .bind(tool_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(AssessmentTool {
            tool_id: row.assessment_tool_id,
            external_tool_id: row.external_assessment_tool_id,
            name: row.name,
            dimensions: self.tool_dimensions(tool_id).await?,
        }))
    }

    async fn find_dimension(&self, dimension_id: i32) -> Result<Option<Dimension>> {
        let row = sqlx::query_as::<_, DimensionRow>(
            "SELECT dimension_id, name FROM dimensions WHERE dimension_id = $1",
        )
        .bind(dimension_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let submission_types = sqlx::query_as::<_, SubmissionTypeRow>(
            r#"
            SELECT dst.submission_type_code, st.name, dst.selection_type
            FROM dimension_submission_types dst
            INNER JOIN submission_types st ON st.submission_type_code = dst.submission_type_code
            WHERE dst.dimension_id = $1
            ORDER BY dst.display_order, dst.submission_type_code
            "#,
        )
        .bind(dimension_id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(|st| DimensionSubmissionType {
            code: st.submission_type_code,
            name: st.name,
            selection_kind: SelectionKind::parse(&st.selection_type),
        })
        .collect();

        let valid_values = sqlx::query_as::<_, ValidValue>(
            r#"
            SELECT value_code, value_name
            FROM dimension_valid_values
            WHERE dimension_id = $1
            ORDER BY display_order, value_code
            "#,
        )
        .bind(dimension_id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(Dimension {
            dimension_id: row.dimension_id,
            name: row.name,
            submission_types,
            valid_values,
        }))
    }

    async fn find_requirement_taxon(
        &self,
        requirement_id: i32,
        tool_id: i32,
    ) -> Result<Option<RequirementTaxon>> {
        let taxon = sqlx::query_as::<_, RequirementTaxon>(
            r#"
            SELECT rt.requirement_id, tx.assessment_tool_id AS tool_id,
                   rt.assessment_taxon_id AS taxon_id, r.name AS requirement_name
            FROM requirement_taxons rt
            INNER JOIN assessment_taxons tx ON tx.assessment_taxon_id = rt.assessment_taxon_id
            INNER JOIN requirements r ON r.requirement_id = rt.requirement_id
            WHERE rt.requirement_id = $1 AND tx.assessment_tool_id = $2
            ORDER BY rt.requirement_taxon_id
            LIMIT 1
            "#,
        )
        .bind(requirement_id)
        .bind(tool_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(taxon)
    }

    async fn taxonomy(&self, tool_id: i32, dimension_id: i32) -> Result<Taxonomy> {
        let rows = sqlx::query_as::<_, TaxonRow>(
            r#"
            SELECT assessment_taxon_id, parent_taxon_id, name, description
            FROM assessment_taxons
            WHERE assessment_tool_id = $1 AND dimension_id = $2
            ORDER BY display_order, assessment_taxon_id
            "#,
        )
        .bind(tool_id)
        .bind(dimension_id)
        .fetch_all(self.pool)
        .await?;

        let mut children: HashMap<Option<i32>, Vec<&TaxonRow>> = HashMap::new();
        for row in &rows {
            children.entry(row.parent_taxon_id).or_default().push(row);
        }

        // Parents must be in the arena before their children.
        let mut taxonomy = Taxonomy::new();
        let mut ids: HashMap<i32, TaxonId> = HashMap::new();
        let mut queue: VecDeque<(&TaxonRow, Option<TaxonId>)> = children
            .get(&None)
            .into_iter()
            .flatten()
            .map(|row| (*row, None))
            .collect();

        while let Some((row, parent)) = queue.pop_front() {
            let id = taxonomy.add_node(&row.name, row.description.clone(), parent);
            ids.insert(row.assessment_taxon_id, id);
            if let Some(kids) = children.get(&Some(row.assessment_taxon_id)) {
                queue.extend(kids.iter().map(|kid| (*kid, Some(id))));
            }
        }

        let leaves = sqlx::query_as::<_, RequirementLeafRow>(
            r#"
            SELECT rt.assessment_taxon_id, r.requirement_id, r.name, rt.is_group_requirement
            FROM requirement_taxons rt
            INNER JOIN assessment_taxons tx ON tx.assessment_taxon_id = rt.assessment_taxon_id
            INNER JOIN requirements r ON r.requirement_id = rt.requirement_id
            WHERE tx.assessment_tool_id = $1 AND tx.dimension_id = $2
            ORDER BY rt.display_order, r.requirement_id
            "#,
        )
        .bind(tool_id)
        .bind(dimension_id)
        .fetch_all(self.pool)
        .await?;

        for leaf in leaves {
            if let Some(&node) = ids.get(&leaf.assessment_taxon_id) {
                taxonomy.add_requirement(node, leaf.requirement_id, leaf.name, leaf.is_group_requirement);
            }
        }

        Ok(taxonomy)
    }
}
