// api.rs - The CRUD collaborators the console core depends on.
//
// The lifecycle and taxonomy services never talk to storage directly.
// They go through these traits, implemented by `HttpApi` (the REST
// backend) and `FileStore` (JSON files on disk).

use async_trait::async_trait;
use bc_content::{EntityId, Publishable};
use bc_taxonomy::{Category, CategoryId, CategoryTreeNode};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Filters accepted by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn page(mut self, skip: u32, limit: u32) -> Self {
        self.skip = skip;
        self.limit = Some(limit);
        self
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub skip: u32,
    pub limit: u32,
}

/// Record CRUD plus status writes for one publishable kind.
#[async_trait]
pub trait ResourceApi<E: Publishable>: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<E>, ApiError>;

    async fn get(&self, id: EntityId) -> Result<E, ApiError>;

    /// Persist a new record; the returned copy carries the assigned id.
    async fn create(&self, entity: &E) -> Result<E, ApiError>;

    async fn update(&self, id: EntityId, entity: &E) -> Result<E, ApiError>;

    async fn delete(&self, id: EntityId) -> Result<(), ApiError>;

    /// Persist `target` as the status of `entity`.
    ///
    /// Performs no lifecycle checks; callers decide legality first.
    async fn set_status(&self, entity: &E, target: E::Status) -> Result<E, ApiError>;
}

/// Category reads and writes.
#[async_trait]
pub trait CategoryApi: Send + Sync {
    /// Flat snapshot, optionally restricted to active categories.
    async fn list_categories(&self, active_only: bool) -> Result<Vec<Category>, ApiError>;

    /// Tree as nested by the backend itself.
    async fn category_tree(&self, active_only: bool) -> Result<Vec<CategoryTreeNode>, ApiError>;

    /// Create (id 0) or update a category.
    async fn save_category(&self, category: &Category) -> Result<Category, ApiError>;

    async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError>;
}
