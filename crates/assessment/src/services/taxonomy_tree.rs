use crate::dto::{DimensionOption, OptionGroup};
use crate::models::{TaxonId, Taxonomy};

/// Flattens a taxonomy into selectable requirement options.
///
/// Traversal is depth first, left to right: a node's own requirements come before
/// everything under its children. Each option carries the names of the nodes above it,
/// outermost first, with the root label left out. A group requirement stands for the
/// node it hangs from, so its path starts one level higher.
pub fn build_options(taxonomy: &Taxonomy) -> Vec<DimensionOption> {
    let mut options = Vec::new();
    let mut stack: Vec<TaxonId> = taxonomy.roots().into_iter().rev().collect();

    while let Some(id) = stack.pop() {
        let Some(node) = taxonomy.node(id) else {
            continue;
        };

        for leaf in &node.requirements {
            let start = if leaf.is_group_requirement {
                node.parent
            } else {
                Some(id)
            };
            options.push(DimensionOption {
                name: leaf.name.clone(),
                requirement_id: leaf.requirement_id,
                group_requirement: leaf.is_group_requirement,
                description: node.description.clone(),
                groups: ancestor_groups(taxonomy, start),
            });
        }

        stack.extend(node.children.iter().rev().copied());
    }

    options
}

fn ancestor_groups(taxonomy: &Taxonomy, start: Option<TaxonId>) -> Vec<OptionGroup> {
    let mut path = Vec::new();
    let mut current = start;
    while let Some(id) = current {
        let Some(node) = taxonomy.node(id) else {
            break;
        };
        path.push(node);
        current = node.parent;
    }

    // The last entry collected is the root; its name is the taxonomy label.
    path.pop();

    path.into_iter()
        .rev()
        .enumerate()
        .map(|(index, node)| OptionGroup {
            level: index as u32 + 1,
            name: node.name.clone(),
            description: node.description.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_names(option: &DimensionOption) -> Vec<(u32, &str)> {
        option
            .groups
            .iter()
            .map(|g| (g.level, g.name.as_str()))
            .collect()
    }

    #[test]
    fn test_requirement_path_drops_root_label() {
        let mut taxonomy = Taxonomy::new();
        let root = taxonomy.add_node("Root", None, None);
        let a = taxonomy.add_node("A", None, Some(root));
        let b = taxonomy.add_node("B", None, Some(a));
        taxonomy.add_requirement(b, 1, "R", false);

        let options = build_options(&taxonomy);

        assert_eq!(options.len(), 1);
        assert_eq!(group_names(&options[0]), vec![(1, "A"), (2, "B")]);
    }

    #[test]
    fn test_group_requirement_path_starts_at_parent() {
        let mut taxonomy = Taxonomy::new();
        let root = taxonomy.add_node("Root", None, None);
        let a = taxonomy.add_node("A", None, Some(root));
        let b = taxonomy.add_node("B", None, Some(a));
        taxonomy.add_requirement(b, 1, "All of B", true);

        let options = build_options(&taxonomy);

        assert_eq!(group_names(&options[0]), vec![(1, "A")]);
        assert!(options[0].group_requirement);
    }

    #[test]
    fn test_requirements_on_root() {
        let mut taxonomy = Taxonomy::new();
        let root = taxonomy.add_node("Root", None, None);
        taxonomy.add_requirement(root, 1, "Plain", false);
        taxonomy.add_requirement(root, 2, "Group", true);

        let options = build_options(&taxonomy);

        assert!(options.iter().all(|o| o.groups.is_empty()));
    }

    #[test]
    fn test_depth_first_order_keeps_siblings_unsorted() {
        let mut taxonomy = Taxonomy::new();
        let root = taxonomy.add_node("Location", None, None);
        let south = taxonomy.add_node("South", None, Some(root));
        let north = taxonomy.add_node("North", None, Some(root));
        let london = taxonomy.add_node("London", Some("Greater London".to_string()), Some(south));
        taxonomy.add_requirement(south, 10, "South (all)", true);
        taxonomy.add_requirement(london, 11, "Central London", false);
        taxonomy.add_requirement(north, 20, "Leeds", false);

        let options = build_options(&taxonomy);
        let ids: Vec<i32> = options.iter().map(|o| o.requirement_id).collect();

        assert_eq!(ids, vec![10, 11, 20]);
        assert!(options[0].groups.is_empty());
        assert_eq!(group_names(&options[1]), vec![(1, "South"), (2, "London")]);
        assert_eq!(options[1].description.as_deref(), Some("Greater London"));
        assert_eq!(
            options[1].groups[1].description.as_deref(),
            Some("Greater London")
        );
        assert_eq!(group_names(&options[2]), vec![(1, "North")]);
    }

    #[test]
    fn test_empty_nodes_contribute_nothing() {
        let mut taxonomy = Taxonomy::new();
        let root = taxonomy.add_node("Root", None, None);
        taxonomy.add_node("Empty", None, Some(root));

        assert!(build_options(&taxonomy).is_empty());
        assert!(build_options(&Taxonomy::new()).is_empty());
    }
}
