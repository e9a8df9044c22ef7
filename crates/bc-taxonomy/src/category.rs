// category.rs - Flat category records and derived tree nodes.

use serde::{Deserialize, Serialize};

/// Numeric identity assigned by the category collaborator.
pub type CategoryId = i64;

/// A category as stored: flat, with an optional parent link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Supplied by the counting query; zero when the source omits it.
    #[serde(default)]
    pub post_count: u32,
}

fn default_active() -> bool {
    true
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            description: None,
            parent_id: None,
            display_order: 0,
            is_active: true,
            post_count: 0,
        }
    }

    pub fn with_parent(mut self, parent_id: CategoryId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }

    pub fn with_posts(mut self, post_count: u32) -> Self {
        self.post_count = post_count;
        self
    }
}

/// A category with its ordered children.
///
/// Built in memory per query and never persisted. Serializes as the
/// category's own fields plus `children`, the same shape the category
/// tree endpoint returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTreeNode {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default)]
    pub children: Vec<CategoryTreeNode>,
}

impl CategoryTreeNode {
    pub fn leaf(category: Category) -> Self {
        Self {
            category,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> CategoryId {
        self.category.id
    }

    /// Number of nodes in this subtree, including the node itself.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(&node.children);
        }
        count
    }
}

// Dropping nested children recursively would overflow the stack on a
// deep chain, so subtrees are detached into a worklist first.
impl Drop for CategoryTreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
