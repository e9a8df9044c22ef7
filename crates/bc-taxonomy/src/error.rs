// error.rs - Error types for the taxonomy subsystem.

use thiserror::Error;

use crate::category::CategoryId;

/// Integrity problems in a category graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    /// The stored parent links form a loop.
    #[error("category cycle detected: {}", render_path(.path))]
    Cycle { path: Vec<CategoryId> },

    /// A category cannot be its own parent.
    #[error("category {id} cannot be its own parent")]
    SelfParent { id: CategoryId },

    /// The requested parent sits below the category being moved.
    #[error("category {parent} is a descendant of {id} and cannot become its parent")]
    DescendantParent { id: CategoryId, parent: CategoryId },

    /// The requested parent does not exist in the snapshot.
    #[error("parent category {parent} not found")]
    UnknownParent { parent: CategoryId },

    /// Another category already uses this slug.
    #[error("Category with this slug already exists: '{slug}'")]
    DuplicateSlug { slug: String },

    /// Deleting would orphan the listed children.
    #[error("Cannot delete category with children. Delete children first. ({id} has {})", render_ids(.children))]
    HasChildren {
        id: CategoryId,
        children: Vec<CategoryId>,
    },
}

fn render_ids(ids: &[CategoryId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_path(path: &[CategoryId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
