// flatten.rs - Depth-first linearization of the tree for single-select UIs.

use serde::{Deserialize, Serialize};

use crate::category::{Category, CategoryId, CategoryTreeNode};

/// Prefix repeated once per level in front of a category name.
pub const INDENT_MARKER: &str = "— ";

/// One row of a flattened category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatEntry {
    #[serde(flatten)]
    pub category: Category,
    pub level: usize,
    #[serde(rename = "fullPath")]
    pub full_path: String,
}

impl FlatEntry {
    pub fn id(&self) -> CategoryId {
        self.category.id
    }
}

/// Pre-order walk emitting one entry per node.
///
/// `level` is the depth assigned to the top-level nodes passed in
/// (normally 0); `full_path` is the name prefixed with
/// [`INDENT_MARKER`] repeated `level` times.
pub fn flatten_tree(tree: &[CategoryTreeNode], level: usize) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    let mut pending: Vec<(&CategoryTreeNode, usize)> =
        tree.iter().rev().map(|node| (node, level)).collect();

    while let Some((node, level)) = pending.pop() {
        entries.push(FlatEntry {
            category: node.category.clone(),
            level,
            full_path: format!("{}{}", INDENT_MARKER.repeat(level), node.category.name),
        });
        pending.extend(node.children.iter().rev().map(|child| (child, level + 1)));
    }

    entries
}

/// Drop the entry for the category being edited, keeping the rest in order.
pub fn exclude_category(entries: Vec<FlatEntry>, id: CategoryId) -> Vec<FlatEntry> {
    entries.into_iter().filter(|e| e.id() != id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;

    fn sample() -> Vec<CategoryTreeNode> {
        build_tree(&[
            Category::new(1, "Destinations", "destinations"),
            Category::new(2, "Annapurna", "annapurna").with_parent(1),
            Category::new(3, "Everest", "everest").with_parent(1).with_order(1),
        ])
    }

    #[test]
    fn levels_and_paths_follow_depth() {
        let flat = flatten_tree(&sample(), 0);
        let levels: Vec<usize> = flat.iter().map(|e| e.level).collect();
        let paths: Vec<&str> = flat.iter().map(|e| e.full_path.as_str()).collect();
        assert_eq!(levels, vec![0, 1, 1]);
        assert_eq!(paths, vec!["Destinations", "— Annapurna", "— Everest"]);
    }

    #[test]
    fn pre_order_visits_children_before_next_sibling() {
        let tree = build_tree(&[
            Category::new(1, "A", "a"),
            Category::new(2, "A1", "a1").with_parent(1),
            Category::new(3, "A1x", "a1x").with_parent(2),
            Category::new(4, "B", "b").with_order(1),
        ]);
        let flat = flatten_tree(&tree, 0);
        let ids: Vec<CategoryId> = flat.iter().map(FlatEntry::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(flat[2].full_path, "— — A1x");
    }

    #[test]
    fn deep_chain_flattens_in_order() {
        let depth: CategoryId = 5_000;
        let categories: Vec<Category> = (1..=depth)
            .map(|id| {
                let category = Category::new(id, format!("L{id}"), format!("l-{id}"));
                if id == 1 {
                    category
                } else {
                    category.with_parent(id - 1)
                }
            })
            .collect();

        let flat = flatten_tree(&build_tree(&categories), 0);
        assert_eq!(flat.len(), depth as usize);
        assert!(flat.iter().enumerate().all(|(i, e)| e.level == i && e.id() == i as CategoryId + 1));
        assert!(flat[3].full_path.starts_with("— — — L4"));
    }

    #[test]
    fn starting_level_offsets_every_entry() {
        let flat = flatten_tree(&sample(), 2);
        assert_eq!(flat[0].level, 2);
        assert_eq!(flat[0].full_path, "— — Destinations");
    }

    #[test]
    fn excluding_removes_exactly_one_and_keeps_order() {
        let flat = flatten_tree(&sample(), 0);
        let remaining = exclude_category(flat.clone(), 2);
        assert_eq!(remaining.len(), flat.len() - 1);
        let ids: Vec<CategoryId> = remaining.iter().map(FlatEntry::id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn flat_entry_wire_shape() {
        let flat = flatten_tree(&sample(), 0);
        let json = serde_json::to_value(&flat[1]).unwrap();
        assert_eq!(json["fullPath"], "— Annapurna");
        assert_eq!(json["level"], 1);
        assert_eq!(json["parent_id"], 1);
    }
}
