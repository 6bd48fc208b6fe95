use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::debug;

use crate::dto::{
    AssessmentView, CreateAssessmentRequest, CriterionDefinition, CriterionRef, CriterionValue,
    DimensionDefinition, DimensionRequirement, DimensionRequirementView, RequirementRequest,
    RequirementView, WeightingRange,
};
use crate::error::{AssessmentError, Result};
use crate::models::{
    Assessment, AssessmentSelection, AssessmentSelectionDetail, AssessmentTool, Dimension,
    DimensionWeighting, SelectionKind, SelectionValue,
};
use crate::repository::{AssessmentStore, TaxonomyStore};
use crate::services::taxonomy_tree;

const MAX_TOTAL_WEIGHTING: Decimal = Decimal::ONE_HUNDRED;

/// Creates and edits assessment definitions.
///
/// Every operation loads the aggregate, applies the change to that copy and saves it
/// once at the end. Any error returned before the save leaves the stored assessment as
/// it was.
pub struct AssessmentDefinitionService<'a, T: TaxonomyStore, A: AssessmentStore> {
    taxonomy: &'a T,
    assessments: &'a A,
}

impl<'a, T: TaxonomyStore, A: AssessmentStore> AssessmentDefinitionService<'a, T, A> {
    pub fn new(taxonomy: &'a T, assessments: &'a A) -> Self {
        Self {
            taxonomy,
            assessments,
        }
    }

    pub async fn create_assessment(
        &self,
        request: &CreateAssessmentRequest,
        principal: &str,
    ) -> Result<i32> {
        debug!(tool_id = request.tool_id, "Create assessment");

        let tool = self.find_tool(request.tool_id).await?;
        let mut assessment = Assessment::new(
            tool.tool_id,
            request.assessment_name.clone(),
            &request.buyer_organisation_id,
            principal,
        );

        for dimension_requirement in &request.dimension_requirements {
            let dimension_id = dimension_requirement.dimension_id.ok_or_else(|| {
                AssessmentError::validation("You must supply a value for dimension-id")
            })?;
            let dimension = self
                .validate_dimension_input(&tool, dimension_requirement, dimension_id)
                .await?;

            let mut weighting = DimensionWeighting::new(dimension.dimension_id, &dimension.name, principal);
            weighting.weighting_percentage = dimension_requirement.weighting_or_zero();
            weighting.submission_types =
                included_submission_types(dimension_requirement, &dimension)?;
            assessment.dimension_weightings.push(weighting);

            for requirement in dimension_requirement.requirements.iter().flatten() {
                self.apply_requirement(&mut assessment, &dimension, requirement, principal)
                    .await?;
            }
        }

        check_total_weighting(&assessment)?;

        let assessment_id = self.assessments.save_assessment(&assessment).await?;
        debug!(assessment_id, "Assessment created");
        Ok(assessment_id)
    }

    /// Upserts one dimension weighting and, optionally, its requirement selections.
    pub async fn update_dimension(
        &self,
        assessment_id: i32,
        dimension_id: i32,
        dimension_requirement: &DimensionRequirement,
        principal: &str,
    ) -> Result<i32> {
        debug!(assessment_id, dimension_id, "Update dimension");

        let mut assessment = self.find_assessment(assessment_id).await?;
        let tool = self.find_tool(assessment.tool_id).await?;

        self.apply_dimension(
            &mut assessment,
            &tool,
            dimension_id,
            dimension_requirement,
            principal,
        )
        .await?;

        check_total_weighting(&assessment)?;
        assessment.touch(principal);
        self.assessments.save_assessment(&assessment).await?;

        Ok(dimension_id)
    }

    /// Applies several dimension updates as one change.
    pub async fn update_dimensions(
        &self,
        assessment_id: i32,
        dimension_requirements: &[DimensionRequirement],
        principal: &str,
    ) -> Result<()> {
        let requested_total: Decimal = dimension_requirements
            .iter()
            .map(DimensionRequirement::weighting_or_zero)
            .sum();
        if requested_total > MAX_TOTAL_WEIGHTING {
            return Err(weighting_total_error());
        }

        let mut assessment = self.find_assessment(assessment_id).await?;
        let tool = self.find_tool(assessment.tool_id).await?;

        for dimension_requirement in dimension_requirements {
            let dimension_id = dimension_requirement.dimension_id.ok_or_else(|| {
                AssessmentError::validation("You must supply a value for dimension-id")
            })?;
            self.apply_dimension(
                &mut assessment,
                &tool,
                dimension_id,
                dimension_requirement,
                principal,
            )
            .await?;
        }

        check_total_weighting(&assessment)?;
        assessment.touch(principal);
        self.assessments.save_assessment(&assessment).await?;

        Ok(())
    }

    pub async fn update_requirement(
        &self,
        assessment_id: i32,
        dimension_id: i32,
        requirement: &RequirementRequest,
        principal: &str,
    ) -> Result<i32> {
        debug!(
            assessment_id,
            dimension_id,
            requirement_id = requirement.requirement_id,
            "Update requirement"
        );

        let mut assessment = self.find_assessment(assessment_id).await?;
        let tool = self.find_tool(assessment.tool_id).await?;
        if tool.dimension(dimension_id).is_none() {
            return Err(dimension_not_found(dimension_id));
        }
        let dimension = self.find_dimension(dimension_id).await?;

        self.apply_requirement(&mut assessment, &dimension, requirement, principal)
            .await?;

        check_total_weighting(&assessment)?;
        assessment.touch(principal);
        self.assessments.save_assessment(&assessment).await?;

        Ok(requirement.requirement_id)
    }

    pub async fn delete_requirement(
        &self,
        assessment_id: i32,
        dimension_id: i32,
        requirement_id: i32,
        principal: &str,
    ) -> Result<()> {
        let mut assessment = self.find_assessment(assessment_id).await?;

        if !assessment.remove_selection(dimension_id, requirement_id) {
            return Err(AssessmentError::not_found(format!(
                "Assessment Selection for Assessment [{assessment_id}], Dimension [{dimension_id}] and Requirement [{requirement_id}] not found"
            )));
        }

        debug!(assessment_id, dimension_id, requirement_id, "Requirement removed");
        assessment.touch(principal);
        self.assessments.save_assessment(&assessment).await?;

        Ok(())
    }

    /// The stored definition with coded values turned back into their display names.
    pub async fn get_assessment(&self, assessment_id: i32) -> Result<AssessmentView> {
        let assessment = self.find_assessment(assessment_id).await?;

        let mut dimension_requirements = Vec::with_capacity(assessment.dimension_weightings.len());
        for weighting in &assessment.dimension_weightings {
            let dimension = self.find_dimension(weighting.dimension_id).await?;

            let requirements = assessment
                .selections_for(weighting.dimension_id)
                .map(|selection| {
                    let values = selection
                        .details
                        .iter()
                        .map(|detail| decode_detail(detail, &dimension))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(RequirementView {
                        requirement_id: selection.requirement_id,
                        name: selection.requirement_name.clone(),
                        weighting: selection.weighting_percentage,
                        values,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            dimension_requirements.push(DimensionRequirementView {
                dimension_id: weighting.dimension_id,
                name: weighting.dimension_name.clone(),
                weighting: weighting.weighting_percentage,
                included_criteria: weighting
                    .submission_types
                    .iter()
                    .map(|code| CriterionRef {
                        criterion_id: code.clone(),
                    })
                    .collect(),
                requirements,
            });
        }

        Ok(AssessmentView {
            assessment_id,
            tool_id: assessment.tool_id,
            assessment_name: assessment.assessment_name,
            status: assessment.status,
            buyer_organisation_id: assessment.buyer_organisation_id,
            dimension_requirements,
            scores: None,
        })
    }

    /// Every dimension of a tool with its weighting range, options and criteria.
    pub async fn dimensions_for_tool(&self, tool_id: i32) -> Result<Vec<DimensionDefinition>> {
        let tool = self.find_tool(tool_id).await?;

        let mut definitions = Vec::with_capacity(tool.dimensions.len());
        for tool_dimension in &tool.dimensions {
            let dimension = self.find_dimension(tool_dimension.dimension_id).await?;
            let taxonomy = self
                .taxonomy
                .taxonomy(tool.tool_id, dimension.dimension_id)
                .await?;

            definitions.push(DimensionDefinition {
                dimension_id: dimension.dimension_id,
                name: dimension.name.clone(),
                weighting_range: WeightingRange {
                    min: tool_dimension.min_weighting_pct,
                    max: tool_dimension.max_weighting_pct,
                },
                options: taxonomy_tree::build_options(&taxonomy),
                evaluation_criteria: criteria(&dimension),
            });
        }

        Ok(definitions)
    }

    async fn apply_dimension(
        &self,
        assessment: &mut Assessment,
        tool: &AssessmentTool,
        dimension_id: i32,
        dimension_requirement: &DimensionRequirement,
        principal: &str,
    ) -> Result<()> {
        let dimension = self
            .validate_dimension_input(tool, dimension_requirement, dimension_id)
            .await?;
        let submission_types = included_submission_types(dimension_requirement, &dimension)?;

        match assessment.dimension_weighting_mut(dimension_id) {
            Some(weighting) => {
                weighting.weighting_percentage = dimension_requirement.weighting_or_zero();
                weighting.submission_types = submission_types;
                weighting.timestamps.touch(principal);
            }
            None => {
                debug!(dimension_id, "No dimension weighting yet, creating one");
                let mut weighting = DimensionWeighting::new(dimension_id, &dimension.name, principal);
                weighting.weighting_percentage = dimension_requirement.weighting_or_zero();
                weighting.submission_types = submission_types;
                assessment.dimension_weightings.push(weighting);
            }
        }

        let requirements = dimension_requirement.requirements.as_deref().unwrap_or_default();

        if dimension_requirement.overwrite_requirements == Some(true) {
            let keep: HashSet<i32> = requirements.iter().map(|r| r.requirement_id).collect();
            assessment
                .selections
                .retain(|s| s.dimension_id != dimension_id || keep.contains(&s.requirement_id));
        }

        for requirement in requirements {
            self.apply_requirement(assessment, &dimension, requirement, principal)
                .await?;
        }

        Ok(())
    }

    async fn apply_requirement(
        &self,
        assessment: &mut Assessment,
        dimension: &Dimension,
        requirement: &RequirementRequest,
        principal: &str,
    ) -> Result<()> {
        let dimension_id = dimension.dimension_id;
        let requirement_id = requirement.requirement_id;

        let taxonomy = self
            .taxonomy
            .taxonomy(assessment.tool_id, dimension_id)
            .await?;
        if !taxonomy.contains_requirement(requirement_id) {
            return Err(AssessmentError::validation(format!(
                "Requirement [{requirement_id}] does not exist in Dimension [{dimension_id}]"
            )));
        }

        let details = requirement
            .values
            .iter()
            .map(|value| build_detail(value, dimension))
            .collect::<Result<Vec<_>>>()?;

        if assessment.dimension_weighting(dimension_id).is_none() {
            debug!(dimension_id, "Adding empty dimension weighting for requirement");
            assessment
                .dimension_weightings
                .push(DimensionWeighting::new(dimension_id, &dimension.name, principal));
        }

        if let Some(selection) = assessment.selection_mut(dimension_id, requirement_id) {
            selection.weighting_percentage = requirement.weighting_or_zero();
            selection.details = details;
            selection.timestamps.touch(principal);
            return Ok(());
        }

        let taxon = self
            .taxonomy
            .find_requirement_taxon(requirement_id, assessment.tool_id)
            .await?
            .ok_or_else(|| {
                AssessmentError::not_found(format!(
                    "Requirement Taxon for Requirement [{requirement_id}] and Tool [{}] not found",
                    assessment.tool_id
                ))
            })?;

        debug!(dimension_id, requirement_id, "Creating assessment selection");
        let mut selection =
            AssessmentSelection::new(dimension_id, requirement_id, taxon.requirement_name, principal);
        selection.weighting_percentage = requirement.weighting_or_zero();
        selection.details = details;
        assessment.selections.push(selection);

        Ok(())
    }

    async fn validate_dimension_input(
        &self,
        tool: &AssessmentTool,
        dimension_requirement: &DimensionRequirement,
        dimension_id: i32,
    ) -> Result<Dimension> {
        if let Some(body_id) = dimension_requirement.dimension_id
            && body_id != dimension_id
        {
            return Err(AssessmentError::validation(format!(
                "Dimension-id [{body_id}] does not match dimension-id [{dimension_id}]"
            )));
        }

        let tool_dimension = tool
            .dimension(dimension_id)
            .ok_or_else(|| dimension_not_found(dimension_id))?;
        let dimension = self.find_dimension(dimension_id).await?;

        if let Some(name) = &dimension_requirement.name
            && *name != dimension.name
        {
            return Err(AssessmentError::validation(format!(
                "Dimension name provided [{name}] does not match actual dimension name for id [{dimension_id}] - expected [{}]",
                dimension.name
            )));
        }

        if !tool_dimension.allows_weighting(dimension_requirement.weighting_or_zero()) {
            return Err(AssessmentError::validation(format!(
                "Dimension weighting must fall within allowed min and max values for the Dimension [{}-{}]",
                tool_dimension.min_weighting_pct, tool_dimension.max_weighting_pct
            )));
        }

        Ok(dimension)
    }

    async fn find_assessment(&self, assessment_id: i32) -> Result<Assessment> {
        self.assessments
            .find_assessment(assessment_id)
            .await?
            .ok_or_else(|| {
                AssessmentError::not_found(format!("Assessment [{assessment_id}] not found"))
            })
    }

    async fn find_tool(&self, tool_id: i32) -> Result<AssessmentTool> {
        self.taxonomy
            .find_tool(tool_id)
            .await?
            .ok_or_else(|| AssessmentError::not_found(format!("Assessment Tool [{tool_id}] not found")))
    }

    async fn find_dimension(&self, dimension_id: i32) -> Result<Dimension> {
        self.taxonomy
            .find_dimension(dimension_id)
            .await?
            .ok_or_else(|| dimension_not_found(dimension_id))
    }
}

fn dimension_not_found(dimension_id: i32) -> AssessmentError {
    AssessmentError::not_found(format!("Dimension [{dimension_id}] not found"))
}

fn weighting_total_error() -> AssessmentError {
    AssessmentError::validation("Sum of all Dimension Weightings cannot exceed 100%")
}

fn check_total_weighting(assessment: &Assessment) -> Result<()> {
    if assessment.total_weighting() > MAX_TOTAL_WEIGHTING {
        return Err(weighting_total_error());
    }
    Ok(())
}

fn submission_type_not_found(code: &str) -> AssessmentError {
    AssessmentError::validation(format!("Submission Type for Criterion [{code}] not found"))
}

fn included_submission_types(
    dimension_requirement: &DimensionRequirement,
    dimension: &Dimension,
) -> Result<Vec<String>> {
    let mut codes: Vec<String> = Vec::with_capacity(dimension_requirement.included_criteria.len());
    for criterion in &dimension_requirement.included_criteria {
        let submission_type = dimension
            .submission_type(&criterion.criterion_id)
            .ok_or_else(|| submission_type_not_found(&criterion.criterion_id))?;
        if !codes.contains(&submission_type.code) {
            codes.push(submission_type.code.clone());
        }
    }
    Ok(codes)
}

fn build_detail(value: &CriterionValue, dimension: &Dimension) -> Result<AssessmentSelectionDetail> {
    let submission_type = dimension
        .submission_type(&value.criterion_id)
        .ok_or_else(|| submission_type_not_found(&value.criterion_id))?;

    let value = match &submission_type.selection_kind {
        SelectionKind::Select | SelectionKind::MultiSelect => {
            let valid_value = dimension.valid_value_by_name(&value.value).ok_or_else(|| {
                AssessmentError::validation(format!(
                    "A valid value matching [{}] not found for dimension [{}]",
                    value.value, dimension.name
                ))
            })?;
            SelectionValue::ValidValue(valid_value.value_code.clone())
        }
        SelectionKind::Integer => SelectionValue::Numeric(parse_positive_integer(&value.value)?),
        SelectionKind::Unsupported(kind) => {
            return Err(AssessmentError::validation(format!(
                "Dimension Select Type [{kind}] not found"
            )));
        }
    };

    Ok(AssessmentSelectionDetail {
        submission_type_code: submission_type.code.clone(),
        value,
    })
}

fn parse_positive_integer(raw: &str) -> Result<Decimal> {
    match raw.trim().parse::<i64>() {
        Ok(number) if number >= 1 => Ok(Decimal::from(number)),
        _ => Err(AssessmentError::validation(format!(
            "Invalid criterion value [{raw}] - must be positive integer"
        ))),
    }
}

fn decode_detail(detail: &AssessmentSelectionDetail, dimension: &Dimension) -> Result<CriterionValue> {
    let value = match &detail.value {
        SelectionValue::ValidValue(code) => dimension
            .valid_value_by_code(code)
            .map(|vv| vv.value_name.clone())
            .ok_or_else(|| {
                AssessmentError::validation(format!(
                    "A valid value matching [{code}] not found for dimension [{}]",
                    dimension.name
                ))
            })?,
        SelectionValue::Numeric(number) => number.to_string(),
    };

    Ok(CriterionValue {
        criterion_id: detail.submission_type_code.clone(),
        value,
    })
}

fn criteria(dimension: &Dimension) -> Vec<CriterionDefinition> {
    dimension
        .submission_types
        .iter()
        .map(|submission_type| CriterionDefinition {
            criterion_id: submission_type.code.clone(),
            name: submission_type.name.clone(),
            selection_kind: submission_type.selection_kind.to_string(),
            options: if submission_type.selection_kind.uses_valid_values() {
                dimension
                    .valid_values
                    .iter()
                    .map(|vv| vv.value_name.clone())
                    .collect()
            } else {
                Vec::new()
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DimensionSubmissionType, Taxonomy, ToolDimension, ValidValue};
    use crate::repository::memory::InMemoryStore;

    const BUYER: &str = "buyer@example.com";

    fn submission_type(code: &str, name: &str, kind: &str) -> DimensionSubmissionType {
        DimensionSubmissionType {
            code: code.to_string(),
            name: name.to_string(),
            selection_kind: SelectionKind::parse(kind),
        }
    }

    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();

        store
            .insert_tool(AssessmentTool {
                tool_id: 1,
                external_tool_id: "FCA".to_string(),
                name: "Further Competition".to_string(),
                dimensions: vec![
                    ToolDimension {
                        dimension_id: 1,
                        name: "Location".to_string(),
                        min_weighting_pct: Decimal::ZERO,
                        max_weighting_pct: Decimal::ONE_HUNDRED,
                    },
                    ToolDimension {
                        dimension_id: 2,
                        name: "Resource Quantity".to_string(),
                        min_weighting_pct: Decimal::ZERO,
                        max_weighting_pct: Decimal::from(60),
                    },
                ],
            })
            .unwrap();

        store
            .insert_dimension(Dimension {
                dimension_id: 1,
                name: "Location".to_string(),
                submission_types: vec![
                    submission_type("SUP", "Supplier", "select"),
                    submission_type("SUB", "Sub Contractor", "select"),
                ],
                valid_values: vec![
                    ValidValue {
                        value_code: "Y".to_string(),
                        value_name: "Yes".to_string(),
                    },
                    ValidValue {
                        value_code: "N".to_string(),
                        value_name: "No".to_string(),
                    },
                ],
            })
            .unwrap();
        store
            .insert_dimension(Dimension {
                dimension_id: 2,
                name: "Resource Quantity".to_string(),
                submission_types: vec![
                    submission_type("QTY", "Quantity", "integer"),
                    submission_type("TXT", "Notes", "freetext"),
                ],
                valid_values: Vec::new(),
            })
            .unwrap();
        store
            .insert_dimension(Dimension {
                dimension_id: 9,
                name: "Orphan".to_string(),
                submission_types: Vec::new(),
                valid_values: Vec::new(),
            })
            .unwrap();

        let mut location = Taxonomy::new();
        let root = location.add_node("Location", None, None);
        let south = location.add_node("South", None, Some(root));
        let london = location.add_node("London", None, Some(south));
        let north = location.add_node("North", None, Some(root));
        location.add_requirement(london, 10, "Central London", false);
        location.add_requirement(north, 20, "Leeds", false);
        store.insert_taxonomy(1, 1, location).unwrap();

        let mut resource = Taxonomy::new();
        let root = resource.add_node("Resource", None, None);
        let roles = resource.add_node("Roles", None, Some(root));
        resource.add_requirement(roles, 30, "Developer", false);
        resource.add_requirement(roles, 31, "Tester", false);
        store.insert_taxonomy(1, 2, resource).unwrap();

        store
    }

    fn value(criterion: &str, value: &str) -> CriterionValue {
        CriterionValue {
            criterion_id: criterion.to_string(),
            value: value.to_string(),
        }
    }

    fn requirement(requirement_id: i32, weighting: i32, values: Vec<CriterionValue>) -> RequirementRequest {
        RequirementRequest {
            requirement_id,
            name: None,
            weighting: Some(weighting),
            values,
        }
    }

    fn dimension(dimension_id: i32, weighting: i32) -> DimensionRequirement {
        DimensionRequirement {
            dimension_id: Some(dimension_id),
            weighting: Some(weighting),
            ..Default::default()
        }
    }

    fn create_request(dimension_requirements: Vec<DimensionRequirement>) -> CreateAssessmentRequest {
        CreateAssessmentRequest {
            tool_id: 1,
            assessment_name: Some("Hosting".to_string()),
            buyer_organisation_id: "org-1".to_string(),
            dimension_requirements,
        }
    }

    async fn create(store: &InMemoryStore, dimension_requirements: Vec<DimensionRequirement>) -> Result<i32> {
        AssessmentDefinitionService::new(store, store)
            .create_assessment(&create_request(dimension_requirements), BUYER)
            .await
    }

    #[tokio::test]
    async fn test_create_assessment_builds_weightings_and_selections() {
        let store = store();
        let mut location = dimension(1, 40);
        location.included_criteria = vec![CriterionRef {
            criterion_id: "SUP".to_string(),
        }];
        location.requirements = Some(vec![requirement(10, 100, vec![value("SUP", "Yes")])]);

        let id = create(&store, vec![location, dimension(2, 30)]).await.unwrap();

        let stored = store.find_assessment(id).await.unwrap().unwrap();
        assert_eq!(stored.status, crate::models::AssessmentStatus::Active);
        assert_eq!(stored.timestamps.created_by, BUYER);
        assert_eq!(stored.total_weighting(), Decimal::from(70));
        assert_eq!(
            stored.dimension_weighting(1).unwrap().submission_types,
            vec!["SUP".to_string()]
        );

        let selection = stored.selection(1, 10).unwrap();
        assert_eq!(selection.requirement_name, "Central London");
        assert_eq!(selection.weighting_percentage, Decimal::ONE_HUNDRED);
        assert_eq!(
            selection.details,
            vec![AssessmentSelectionDetail {
                submission_type_code: "SUP".to_string(),
                value: SelectionValue::ValidValue("Y".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_create_requires_dimension_id() {
        let store = store();
        let err = create(&store, vec![DimensionRequirement::default()])
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "You must supply a value for dimension-id");
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_tool_and_dimension() {
        let store = store();
        let service = AssessmentDefinitionService::new(&store, &store);

        let mut request = create_request(Vec::new());
        request.tool_id = 99;
        let err = service.create_assessment(&request, BUYER).await.unwrap_err();
        assert_eq!(err.to_string(), "Assessment Tool [99] not found");

        let err = create(&store, vec![dimension(9, 10)]).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Dimension [9] not found");
    }

    #[tokio::test]
    async fn test_create_rejects_mismatched_name() {
        let store = store();
        let mut location = dimension(1, 10);
        location.name = Some("Geography".to_string());

        let err = create(&store, vec![location]).await.unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("expected [Location]"));
    }

    #[tokio::test]
    async fn test_weighting_outside_tool_range_is_rejected() {
        let store = store();
        let err = create(&store, vec![dimension(2, 70)]).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Dimension weighting must fall within allowed min and max values for the Dimension [0-60]"
        );
    }

    #[tokio::test]
    async fn test_create_over_total_weighting_saves_nothing() {
        let store = store();
        let err = create(&store, vec![dimension(1, 60), dimension(2, 50)])
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(store.find_assessment(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_dimension_over_total_leaves_state_unchanged() {
        let store = store();
        let id = create(&store, vec![dimension(1, 60), dimension(2, 40)])
            .await
            .unwrap();
        let service = AssessmentDefinitionService::new(&store, &store);

        let err = service
            .update_dimension(id, 2, &dimension(2, 50), "editor")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Sum of all Dimension Weightings cannot exceed 100%");
        let stored = store.find_assessment(id).await.unwrap().unwrap();
        assert_eq!(
            stored.dimension_weighting(2).unwrap().weighting_percentage,
            Decimal::from(40)
        );
        assert!(stored.timestamps.updated_by.is_none());
    }

    #[tokio::test]
    async fn test_update_dimension_without_weighting_sets_zero() {
        let store = store();
        let id = create(&store, vec![dimension(1, 60)]).await.unwrap();
        let service = AssessmentDefinitionService::new(&store, &store);

        let returned = service
            .update_dimension(id, 1, &DimensionRequirement::default(), "editor")
            .await
            .unwrap();

        assert_eq!(returned, 1);
        let stored = store.find_assessment(id).await.unwrap().unwrap();
        let weighting = stored.dimension_weighting(1).unwrap();
        assert_eq!(weighting.weighting_percentage, Decimal::ZERO);
        assert_eq!(weighting.timestamps.updated_by.as_deref(), Some("editor"));
        assert_eq!(weighting.timestamps.created_by, BUYER);
    }

    #[tokio::test]
    async fn test_update_dimension_rejects_body_path_mismatch_and_bad_criteria() {
        let store = store();
        let id = create(&store, Vec::new()).await.unwrap();
        let service = AssessmentDefinitionService::new(&store, &store);

        let err = service
            .update_dimension(id, 2, &dimension(1, 10), BUYER)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Dimension-id [1] does not match dimension-id [2]");

        let mut bad_criteria = dimension(1, 10);
        bad_criteria.included_criteria = vec![CriterionRef {
            criterion_id: "QTY".to_string(),
        }];
        let err = service
            .update_dimension(id, 1, &bad_criteria, BUYER)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Submission Type for Criterion [QTY] not found");
    }

    #[tokio::test]
    async fn test_overwrite_removes_selections_missing_from_payload() {
        let store = store();
        let mut location = dimension(1, 50);
        location.requirements = Some(vec![
            requirement(10, 50, vec![value("SUP", "Yes")]),
            requirement(20, 50, vec![value("SUP", "No")]),
        ]);
        let id = create(&store, vec![location]).await.unwrap();
        let service = AssessmentDefinitionService::new(&store, &store);

        let mut update = dimension(1, 50);
        update.overwrite_requirements = Some(true);
        update.requirements = Some(vec![requirement(10, 80, vec![value("SUB", "Yes")])]);
        service.update_dimension(id, 1, &update, "editor").await.unwrap();

        let stored = store.find_assessment(id).await.unwrap().unwrap();
        assert!(stored.selection(1, 20).is_none());
        let kept = stored.selection(1, 10).unwrap();
        assert_eq!(kept.weighting_percentage, Decimal::from(80));
        assert_eq!(kept.details[0].submission_type_code, "SUB");
        assert_eq!(kept.timestamps.created_by, BUYER);
    }

    #[tokio::test]
    async fn test_update_without_overwrite_keeps_other_selections() {
        let store = store();
        let mut location = dimension(1, 50);
        location.requirements = Some(vec![requirement(20, 50, vec![])]);
        let id = create(&store, vec![location]).await.unwrap();
        let service = AssessmentDefinitionService::new(&store, &store);

        let mut update = dimension(1, 50);
        update.requirements = Some(vec![requirement(10, 50, vec![])]);
        service.update_dimension(id, 1, &update, BUYER).await.unwrap();

        let stored = store.find_assessment(id).await.unwrap().unwrap();
        assert!(stored.selection(1, 10).is_some());
        assert!(stored.selection(1, 20).is_some());
    }

    #[tokio::test]
    async fn test_update_dimensions_checks_payload_total() {
        let store = store();
        let id = create(&store, Vec::new()).await.unwrap();
        let service = AssessmentDefinitionService::new(&store, &store);

        let err = service
            .update_dimensions(id, &[dimension(1, 70), dimension(2, 40)], BUYER)
            .await
            .unwrap_err();
        assert!(err.is_validation());

        service
            .update_dimensions(id, &[dimension(1, 60), dimension(2, 40)], BUYER)
            .await
            .unwrap();
        let stored = store.find_assessment(id).await.unwrap().unwrap();
        assert_eq!(stored.total_weighting(), Decimal::ONE_HUNDRED);
    }

    #[tokio::test]
    async fn test_update_requirement_creates_missing_dimension_weighting() {
        let store = store();
        let id = create(&store, Vec::new()).await.unwrap();
        let service = AssessmentDefinitionService::new(&store, &store);

        let returned = service
            .update_requirement(id, 2, &requirement(30, 100, vec![value("QTY", "3")]), BUYER)
            .await
            .unwrap();

        assert_eq!(returned, 30);
        let stored = store.find_assessment(id).await.unwrap().unwrap();
        let weighting = stored.dimension_weighting(2).unwrap();
        assert_eq!(weighting.weighting_percentage, Decimal::ZERO);
        assert!(weighting.submission_types.is_empty());
        assert_eq!(
            stored.selection(2, 30).unwrap().details[0].value,
            SelectionValue::Numeric(Decimal::from(3))
        );
    }

    #[tokio::test]
    async fn test_update_requirement_replaces_details() {
        let store = store();
        let id = create(&store, Vec::new()).await.unwrap();
        let service = AssessmentDefinitionService::new(&store, &store);

        service
            .update_requirement(id, 1, &requirement(10, 50, vec![value("SUP", "Yes"), value("SUB", "No")]), BUYER)
            .await
            .unwrap();
        service
            .update_requirement(id, 1, &requirement(10, 60, vec![value("SUB", "Yes")]), "editor")
            .await
            .unwrap();

        let stored = store.find_assessment(id).await.unwrap().unwrap();
        let selection = stored.selection(1, 10).unwrap();
        assert_eq!(selection.details.len(), 1);
        assert_eq!(selection.weighting_percentage, Decimal::from(60));
        assert_eq!(selection.timestamps.updated_by.as_deref(), Some("editor"));
    }

    #[tokio::test]
    async fn test_update_requirement_validation_errors() {
        let store = store();
        let id = create(&store, Vec::new()).await.unwrap();
        let service = AssessmentDefinitionService::new(&store, &store);

        let cases = vec![
            (1, requirement(30, 10, vec![]), "Requirement [30] does not exist in Dimension [1]"),
            (1, requirement(10, 10, vec![value("XX", "Yes")]), "Submission Type for Criterion [XX] not found"),
            (
                1,
                requirement(10, 10, vec![value("SUP", "yes")]),
                "A valid value matching [yes] not found for dimension [Location]",
            ),
            (2, requirement(30, 10, vec![value("QTY", "0")]), "Invalid criterion value [0] - must be positive integer"),
            (2, requirement(30, 10, vec![value("QTY", "two")]), "Invalid criterion value [two] - must be positive integer"),
            (2, requirement(30, 10, vec![value("TXT", "note")]), "Dimension Select Type [freetext] not found"),
        ];

        for (dimension_id, request, message) in cases {
            let err = service
                .update_requirement(id, dimension_id, &request, BUYER)
                .await
                .unwrap_err();
            assert!(err.is_validation(), "{message}");
            assert_eq!(err.to_string(), message);
        }

        let stored = store.find_assessment(id).await.unwrap().unwrap();
        assert!(stored.selections.is_empty());
        assert!(stored.dimension_weightings.is_empty());
    }

    #[tokio::test]
    async fn test_update_requirement_for_dimension_outside_tool_is_not_found() {
        let store = store();
        let id = create(&store, Vec::new()).await.unwrap();
        let service = AssessmentDefinitionService::new(&store, &store);

        let err = service
            .update_requirement(id, 9, &requirement(10, 10, vec![]), BUYER)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Dimension [9] not found");
        let stored = store.find_assessment(id).await.unwrap().unwrap();
        assert!(stored.selections.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_assessment_is_not_found() {
        let store = store();
        let service = AssessmentDefinitionService::new(&store, &store);

        let err = service
            .update_requirement(42, 1, &requirement(10, 10, vec![]), BUYER)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Assessment [42] not found");
    }

    #[tokio::test]
    async fn test_delete_requirement() {
        let store = store();
        let mut location = dimension(1, 50);
        location.requirements = Some(vec![requirement(10, 50, vec![])]);
        let id = create(&store, vec![location]).await.unwrap();
        let service = AssessmentDefinitionService::new(&store, &store);

        service.delete_requirement(id, 1, 10, BUYER).await.unwrap();
        assert!(
            store
                .find_assessment(id)
                .await
                .unwrap()
                .unwrap()
                .selections
                .is_empty()
        );

        let err = service.delete_requirement(id, 1, 10, BUYER).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_assessment_decodes_values() {
        let store = store();
        let mut location = dimension(1, 50);
        location.included_criteria = vec![CriterionRef {
            criterion_id: "SUP".to_string(),
        }];
        location.requirements = Some(vec![requirement(10, 100, vec![value("SUP", "No")])]);
        let mut resource = dimension(2, 20);
        resource.requirements = Some(vec![requirement(31, 100, vec![value("QTY", "4")])]);
        let id = create(&store, vec![location, resource]).await.unwrap();
        let service = AssessmentDefinitionService::new(&store, &store);

        let view = service.get_assessment(id).await.unwrap();

        assert_eq!(view.assessment_id, id);
        assert_eq!(view.assessment_name.as_deref(), Some("Hosting"));
        assert_eq!(view.dimension_requirements.len(), 2);
        let location = &view.dimension_requirements[0];
        assert_eq!(location.included_criteria[0].criterion_id, "SUP");
        assert_eq!(location.requirements[0].values, vec![value("SUP", "No")]);
        assert_eq!(
            view.dimension_requirements[1].requirements[0].values,
            vec![value("QTY", "4")]
        );
        assert!(view.scores.is_none());
    }

    #[tokio::test]
    async fn test_dimensions_for_tool() {
        let store = store();
        let service = AssessmentDefinitionService::new(&store, &store);

        let definitions = service.dimensions_for_tool(1).await.unwrap();

        assert_eq!(definitions.len(), 2);
        let location = &definitions[0];
        assert_eq!(location.name, "Location");
        let ids: Vec<i32> = location.options.iter().map(|o| o.requirement_id).collect();
        assert_eq!(ids, vec![10, 20]);
        assert_eq!(location.evaluation_criteria[0].options, vec!["Yes", "No"]);
        assert_eq!(location.evaluation_criteria[0].selection_kind, "select");

        let resource = &definitions[1];
        assert_eq!(resource.weighting_range.max, Decimal::from(60));
        assert!(resource.evaluation_criteria[0].options.is_empty());

        assert!(service.dimensions_for_tool(7).await.unwrap_err().is_not_found());
    }
}
