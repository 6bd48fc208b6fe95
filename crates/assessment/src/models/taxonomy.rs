use serde::{Deserialize, Serialize};

/// Index of a node inside a [`Taxonomy`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxonId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementLeaf {
    pub requirement_id: i32,
    pub name: String,
    pub is_group_requirement: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonNode {
    pub name: String,
    pub description: Option<String>,
    pub parent: Option<TaxonId>,
    pub children: Vec<TaxonId>,
    pub requirements: Vec<RequirementLeaf>,
}

/// Category tree of one dimension for one tool.
///
/// Nodes live in a flat arena and refer to each other by [`TaxonId`], so parent walks
/// need no shared ownership. Children keep insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Taxonomy {
    nodes: Vec<TaxonNode>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
        parent: Option<TaxonId>,
    ) -> TaxonId {
        let id = TaxonId(self.nodes.len());
        self.nodes.push(TaxonNode {
            name: name.into(),
            description,
            parent,
            children: Vec::new(),
            requirements: Vec::new(),
        });
        if let Some(parent) = parent
            && let Some(node) = self.nodes.get_mut(parent.0)
        {
            node.children.push(id);
        }
        id
    }

    pub fn add_requirement(
        &mut self,
        node: TaxonId,
        requirement_id: i32,
        name: impl Into<String>,
        is_group_requirement: bool,
    ) {
        if let Some(node) = self.nodes.get_mut(node.0) {
            node.requirements.push(RequirementLeaf {
                requirement_id,
                name: name.into(),
                is_group_requirement,
            });
        }
    }

    pub fn node(&self, id: TaxonId) -> Option<&TaxonNode> {
        self.nodes.get(id.0)
    }

    /// Parentless nodes, in insertion order.
    pub fn roots(&self) -> Vec<TaxonId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(index, _)| TaxonId(index))
            .collect()
    }

    pub fn contains_requirement(&self, requirement_id: i32) -> bool {
        self.nodes
            .iter()
            .flat_map(|node| node.requirements.iter())
            .any(|leaf| leaf.requirement_id == requirement_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Binding of a requirement to the taxonomy node of a tool it hangs from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RequirementTaxon {
    pub requirement_id: i32,
    pub tool_id: i32,
    pub taxon_id: i32,
    pub requirement_name: String,
}
