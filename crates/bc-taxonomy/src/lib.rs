//! # bc-taxonomy
//!
//! Hierarchical categories for basecamp's blog and trek taxonomy.
//!
//! Categories are stored flat, each with an optional `parent_id`. This
//! crate derives the two views the console needs from one snapshot:
//!
//! - [`build_tree`]: the nested view for management screens
//! - [`flatten_tree`]: a depth-first, indentation-annotated list for
//!   "parent category" selectors, with [`exclude_category`] removing the
//!   category being edited
//!
//! Tree construction carries a visited-set guard, so a corrupted
//! snapshot with looping parent links cannot hang or duplicate nodes.
//! [`find_cycles`] reports such loops and [`check_parent_assignment`]
//! refuses writes that would create one. [`check_slug_available`] and
//! [`check_removal`] keep slugs unique and parents from being deleted
//! under their children.

pub mod category;
pub mod draft;
pub mod error;
pub mod flatten;
pub mod tree;

pub use category::{Category, CategoryId, CategoryTreeNode};
pub use draft::{check_slug_available, is_valid_slug, validate_category};
pub use error::TaxonomyError;
pub use flatten::{exclude_category, flatten_tree, FlatEntry, INDENT_MARKER};
pub use tree::{
    build_tree, check_parent_assignment, check_removal, ensure_acyclic, find_cycles,
};
