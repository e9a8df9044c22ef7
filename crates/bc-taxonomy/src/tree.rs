// tree.rs - Building the category tree from a flat snapshot.
//
// Construction only descends from declared parent → children links, so
// a node can appear at most once, under its real parent. A visited set
// guards the descent anyway: a corrupted snapshot (self-parented rows,
// loops in parent_id, duplicated ids) must not hang or duplicate nodes.
// Members of a loop are never reachable from a root; they are left out
// of the nested view and reported through `find_cycles`.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::category::{Category, CategoryId, CategoryTreeNode};
use crate::error::TaxonomyError;

type Buckets<'a> = HashMap<Option<CategoryId>, Vec<&'a Category>>;

/// Nest a flat category snapshot.
///
/// Categories without a parent, or whose parent is absent from the
/// snapshot, become roots. Siblings are ordered by `display_order`
/// ascending; ties keep their order in `categories`.
pub fn build_tree(categories: &[Category]) -> Vec<CategoryTreeNode> {
    let present: HashSet<CategoryId> = categories.iter().map(|c| c.id).collect();

    let mut buckets: Buckets<'_> = HashMap::new();
    for category in categories {
        let parent = category.parent_id.filter(|p| present.contains(p));
        buckets.entry(parent).or_default().push(category);
    }
    for siblings in buckets.values_mut() {
        // Stable sort: insertion order breaks ties.
        siblings.sort_by_key(|c| c.display_order);
    }

    // Pre-order walk over an explicit stack; a parent chain can be deeper
    // than the thread stack allows for recursion.
    let mut visited = HashSet::new();
    let mut order: Vec<(&Category, usize)> = Vec::new();
    let mut pending: Vec<(&Category, usize)> = match buckets.get(&None) {
        Some(roots) => roots.iter().rev().map(|c| (*c, 0)).collect(),
        None => Vec::new(),
    };
    while let Some((category, depth)) = pending.pop() {
        if !visited.insert(category.id) {
            tracing::warn!(id = category.id, "category reached twice, skipping");
            continue;
        }
        order.push((category, depth));
        if let Some(kids) = buckets.get(&Some(category.id)) {
            pending.extend(kids.iter().rev().map(|c| (*c, depth + 1)));
        }
    }

    let unreachable: Vec<CategoryId> = categories
        .iter()
        .map(|c| c.id)
        .filter(|id| !visited.contains(id))
        .collect();
    if !unreachable.is_empty() {
        tracing::warn!(
            ?unreachable,
            "categories not reachable from any root were left out of the tree"
        );
    }

    assemble(order)
}

/// Nest a pre-order sequence of `(category, depth)` pairs.
///
/// `open[d]` is the node under construction at depth `d`; a node is
/// attached to its parent once the walk leaves its subtree.
fn assemble(order: Vec<(&Category, usize)>) -> Vec<CategoryTreeNode> {
    let mut roots = Vec::new();
    let mut open: Vec<CategoryTreeNode> = Vec::new();

    for (category, depth) in order {
        close_to(&mut open, &mut roots, depth);
        open.push(CategoryTreeNode::leaf(category.clone()));
    }
    close_to(&mut open, &mut roots, 0);

    roots
}

fn close_to(open: &mut Vec<CategoryTreeNode>, roots: &mut Vec<CategoryTreeNode>, depth: usize) {
    while open.len() > depth {
        let Some(done) = open.pop() else { break };
        match open.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

/// Every loop in the snapshot's parent links.
///
/// Each cycle lists ids in child → parent order, rotated to start at its
/// smallest id. Each loop is reported once.
pub fn find_cycles(categories: &[Category]) -> Vec<Vec<CategoryId>> {
    let parents = parent_map(categories);
    let mut cycles = BTreeSet::new();
    let mut settled: HashSet<CategoryId> = HashSet::new();

    for category in categories {
        let mut path: Vec<CategoryId> = Vec::new();
        let mut on_path: HashMap<CategoryId, usize> = HashMap::new();
        let mut current = Some(category.id);

        while let Some(id) = current {
            if settled.contains(&id) {
                break;
            }
            if let Some(&pos) = on_path.get(&id) {
                cycles.insert(rotate_to_min(&path[pos..]));
                break;
            }
            on_path.insert(id, path.len());
            path.push(id);
            current = parents.get(&id).copied().flatten();
        }

        settled.extend(path);
    }

    cycles.into_iter().collect()
}

/// Fail with the first loop found, if any.
pub fn ensure_acyclic(categories: &[Category]) -> Result<(), TaxonomyError> {
    match find_cycles(categories).into_iter().next() {
        Some(path) => Err(TaxonomyError::Cycle { path }),
        None => Ok(()),
    }
}

/// Check a parent link before it is written.
///
/// `id` is `None` for a category that does not exist yet. Rejects a
/// missing parent, self-parenting, and a parent that currently sits
/// below `id` (which would close a loop).
pub fn check_parent_assignment(
    categories: &[Category],
    id: Option<CategoryId>,
    parent: Option<CategoryId>,
) -> Result<(), TaxonomyError> {
    let Some(parent) = parent else {
        return Ok(());
    };
    if id == Some(parent) {
        return Err(TaxonomyError::SelfParent { id: parent });
    }

    let parents = parent_map(categories);
    if !parents.contains_key(&parent) {
        return Err(TaxonomyError::UnknownParent { parent });
    }

    if let Some(id) = id {
        // Walk upward from the proposed parent; meeting `id` means the
        // parent is one of its descendants.
        let mut seen = HashSet::new();
        let mut current = Some(parent);
        while let Some(ancestor) = current {
            if ancestor == id {
                return Err(TaxonomyError::DescendantParent { id, parent });
            }
            if !seen.insert(ancestor) {
                break;
            }
            current = parents.get(&ancestor).copied().flatten();
        }
    }

    Ok(())
}

/// Refuse to delete a category that other categories point at.
///
/// Children must be removed (or moved) first, so a delete never leaves
/// dangling parent links behind.
pub fn check_removal(categories: &[Category], id: CategoryId) -> Result<(), TaxonomyError> {
    let children: Vec<CategoryId> = categories
        .iter()
        .filter(|c| c.parent_id == Some(id) && c.id != id)
        .map(|c| c.id)
        .collect();
    if children.is_empty() {
        Ok(())
    } else {
        Err(TaxonomyError::HasChildren { id, children })
    }
}

fn parent_map(categories: &[Category]) -> HashMap<CategoryId, Option<CategoryId>> {
    categories.iter().map(|c| (c.id, c.parent_id)).collect()
}

fn rotate_to_min(cycle: &[CategoryId]) -> Vec<CategoryId> {
    let start = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map(|(i, _)| i)
        .unwrap_or(0);
    cycle[start..].iter().chain(&cycle[..start]).copied().collect()
}
