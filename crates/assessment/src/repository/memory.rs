use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{AssessmentError, Result};
use crate::models::{
    Assessment, AssessmentResult, AssessmentTool, CalculationBase, Dimension, RequirementTaxon,
    TaxonId, Taxonomy,
};
use crate::repository::{AssessmentStore, CalculationBaseQuery, ResultStore, TaxonomyStore};

#[derive(Default)]
struct State {
    tools: HashMap<i32, AssessmentTool>,
    dimensions: HashMap<i32, Dimension>,
    taxonomies: HashMap<(i32, i32), Taxonomy>,
    requirement_taxa: HashMap<(i32, i32), RequirementTaxon>,
    assessments: BTreeMap<i32, Assessment>,
    last_assessment_id: i32,
    calculation_base: HashMap<i32, Vec<CalculationBase>>,
    results: Vec<AssessmentResult>,
}

/// Process-local implementation of every store trait.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| AssessmentError::Unavailable(e.to_string()))
    }

    pub fn insert_tool(&self, tool: AssessmentTool) -> Result<()> {
        self.lock()?.tools.insert(tool.tool_id, tool);
        Ok(())
    }

    pub fn insert_dimension(&self, dimension: Dimension) -> Result<()> {
        self.lock()?.dimensions.insert(dimension.dimension_id, dimension);
        Ok(())
    }

    /// Stores a taxonomy and binds each of its requirements to the tool.
    pub fn insert_taxonomy(&self, tool_id: i32, dimension_id: i32, taxonomy: Taxonomy) -> Result<()> {
        let mut state = self.lock()?;
        for index in 0..taxonomy.len() {
            let Some(node) = taxonomy.node(TaxonId(index)) else {
                continue;
            };
            for leaf in &node.requirements {
                state.requirement_taxa.insert(
                    (leaf.requirement_id, tool_id),
                    RequirementTaxon {
                        requirement_id: leaf.requirement_id,
                        tool_id,
                        taxon_id: index as i32,
                        requirement_name: leaf.name.clone(),
                    },
                );
            }
        }
        state.taxonomies.insert((tool_id, dimension_id), taxonomy);
        Ok(())
    }

    pub fn set_calculation_base(&self, assessment_id: i32, rows: Vec<CalculationBase>) -> Result<()> {
        self.lock()?.calculation_base.insert(assessment_id, rows);
        Ok(())
    }

    pub fn results(&self) -> Result<Vec<AssessmentResult>> {
        Ok(self.lock()?.results.clone())
    }
}

#[async_trait]
impl TaxonomyStore for InMemoryStore {
    async fn find_tool(&self, tool_id: i32) -> Result<Option<AssessmentTool>> {
        Ok(self.lock()?.tools.get(&tool_id).cloned())
    }

    async fn find_dimension(&self, dimension_id: i32) -> Result<Option<Dimension>> {
        Ok(self.lock()?.dimensions.get(&dimension_id).cloned())
    }

    async fn find_requirement_taxon(
        &self,
        requirement_id: i32,
        tool_id: i32,
    ) -> Result<Option<RequirementTaxon>> {
        Ok(self
            .lock()?
            .requirement_taxa
            .get(&(requirement_id, tool_id))
            .cloned())
    }

    async fn taxonomy(&self, tool_id: i32, dimension_id: i32) -> Result<Taxonomy> {
        Ok(self
            .lock()?
            .taxonomies
            .get(&(tool_id, dimension_id))
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl AssessmentStore for InMemoryStore {
    async fn find_assessment(&self, assessment_id: i32) -> Result<Option<Assessment>> {
        Ok(self.lock()?.assessments.get(&assessment_id).cloned())
    }

    async fn save_assessment(&self, assessment: &Assessment) -> Result<i32> {
        let mut state = self.lock()?;
        let assessment_id = match assessment.assessment_id {
            Some(id) => id,
            None => {
                state.last_assessment_id += 1;
                state.last_assessment_id
            }
        };

        let mut stored = assessment.clone();
        stored.assessment_id = Some(assessment_id);
        state.assessments.insert(assessment_id, stored);

        Ok(assessment_id)
    }
}

#[async_trait]
impl CalculationBaseQuery for InMemoryStore {
    async fn calculation_base(&self, assessment_id: i32) -> Result<Vec<CalculationBase>> {
        Ok(self
            .lock()?
            .calculation_base
            .get(&assessment_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ResultStore for InMemoryStore {
    async fn find_result(
        &self,
        assessment_id: i32,
        supplier_organisation_id: &str,
    ) -> Result<Option<AssessmentResult>> {
        Ok(self
            .lock()?
            .results
            .iter()
            .find(|r| {
                r.assessment_id == assessment_id
                    && r.supplier_organisation_id == supplier_organisation_id
            })
            .cloned())
    }

    async fn save_result(&self, result: &AssessmentResult) -> Result<()> {
        let mut state = self.lock()?;
        match state.results.iter_mut().find(|r| {
            r.assessment_id == result.assessment_id
                && r.supplier_organisation_id == result.supplier_organisation_id
        }) {
            Some(existing) => *existing = result.clone(),
            None => state.results.push(result.clone()),
        }
        Ok(())
    }
}
