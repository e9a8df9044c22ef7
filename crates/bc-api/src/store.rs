// store.rs - FileStore: JSON-file backend for offline use and tests.
//
// Each record is stored as `<store_dir>/<collection>/<id>.json`, so treks
// and expeditions live side by side and can be inspected by hand. The
// category taxonomy is small and always read whole, so it is a single
// `<store_dir>/categories.json` array.
//
// Ids are assigned on create as one past the largest id on disk. Paging
// mirrors the REST API: default page of 10, capped at 100.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bc_content::{EntityId, EntityKind, Lifecycle, Publishable};
use bc_taxonomy::{
    build_tree, check_removal, check_slug_available, Category, CategoryId, CategoryTreeNode,
};
use chrono::Utc;

use crate::api::{CategoryApi, ListQuery, Page, ResourceApi};
use crate::error::ApiError;

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// Persistent store for content records and categories.
pub struct FileStore {
    store_dir: PathBuf,
}

impl FileStore {
    /// Create a store backed by the given directory, creating it if needed.
    pub fn new(store_dir: impl AsRef<Path>) -> Result<Self, ApiError> {
        let store_dir = store_dir.as_ref().to_path_buf();
        fs::create_dir_all(&store_dir).map_err(|e| ApiError::io(&store_dir, e))?;
        Ok(Self { store_dir })
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Write a record, assigning an id first when it has none (id 0).
    pub fn save<E: Publishable>(&self, entity: &E) -> Result<E, ApiError> {
        let mut entity = entity.clone();
        if entity.id() == 0 {
            let next = self.load_all::<E>()?.iter().map(Publishable::id).max().unwrap_or(0) + 1;
            entity.set_id(next);
        }

        let dir = self.collection_dir(E::KIND);
        fs::create_dir_all(&dir).map_err(|e| ApiError::io(&dir, e))?;
        let path = self.record_file(E::KIND, entity.id());
        let json = serde_json::to_string_pretty(&entity)?;
        fs::write(&path, json).map_err(|e| ApiError::io(&path, e))?;
        Ok(entity)
    }

    /// Read one record; `None` when no file exists for `id`.
    pub fn load<E: Publishable>(&self, id: EntityId) -> Result<Option<E>, ApiError> {
        let path = self.record_file(E::KIND, id);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path).map_err(|e| ApiError::io(&path, e))?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Every record of one kind, newest (highest id) first.
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn load_all<E: Publishable>(&self) -> Result<Vec<E>, ApiError> {
        let dir = self.collection_dir(E::KIND);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let entries = fs::read_dir(&dir).map_err(|e| ApiError::io(&dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| ApiError::io(&dir, e))?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            let json = fs::read_to_string(&path).map_err(|e| ApiError::io(&path, e))?;
            match serde_json::from_str::<E>(&json) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable record"),
            }
        }

        records.sort_by_key(|r| std::cmp::Reverse(r.id()));
        Ok(records)
    }

    /// Delete a record. Returns whether a file was removed.
    pub fn remove<E: Publishable>(&self, id: EntityId) -> Result<bool, ApiError> {
        let path = self.record_file(E::KIND, id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|e| ApiError::io(&path, e))?;
        Ok(true)
    }

    /// The whole category snapshot in file order; empty when never written.
    pub fn load_categories(&self) -> Result<Vec<Category>, ApiError> {
        let path = self.categories_file();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&path).map_err(|e| ApiError::io(&path, e))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Replace the category snapshot.
    pub fn write_categories(&self, categories: &[Category]) -> Result<(), ApiError> {
        let path = self.categories_file();
        let json = serde_json::to_string_pretty(categories)?;
        fs::write(&path, json).map_err(|e| ApiError::io(&path, e))?;
        Ok(())
    }

    fn collection_dir(&self, kind: EntityKind) -> PathBuf {
        self.store_dir.join(kind.collection())
    }

    fn record_file(&self, kind: EntityKind, id: EntityId) -> PathBuf {
        self.collection_dir(kind).join(format!("{}.json", id))
    }

    fn categories_file(&self) -> PathBuf {
        self.store_dir.join("categories.json")
    }

    fn require<E: Publishable>(&self, id: EntityId) -> Result<E, ApiError> {
        self.load(id)?.ok_or_else(|| ApiError::NotFound {
            resource: E::KIND.label().to_string(),
            id,
        })
    }
}

fn matches_query<E: Publishable>(entity: &E, query: &ListQuery) -> bool {
    if let Some(status) = &query.status {
        if entity.status().as_str() != status {
            return false;
        }
    }
    match &query.search {
        Some(search) => entity
            .name()
            .to_lowercase()
            .contains(&search.trim().to_lowercase()),
        None => true,
    }
}

#[async_trait]
impl<E: Publishable> ResourceApi<E> for FileStore {
    async fn list(&self, query: &ListQuery) -> Result<Page<E>, ApiError> {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let matching: Vec<E> = self
            .load_all::<E>()?
            .into_iter()
            .filter(|e| matches_query(e, query))
            .collect();

        Ok(Page {
            total: matching.len() as u64,
            items: matching
                .into_iter()
                .skip(query.skip as usize)
                .take(limit as usize)
                .collect(),
            skip: query.skip,
            limit,
        })
    }

    async fn get(&self, id: EntityId) -> Result<E, ApiError> {
        self.require(id)
    }

    async fn create(&self, entity: &E) -> Result<E, ApiError> {
        let mut entity = entity.clone();
        entity.set_id(0);
        self.save(&entity)
    }

    async fn update(&self, id: EntityId, entity: &E) -> Result<E, ApiError> {
        self.require::<E>(id)?;
        let mut entity = entity.clone();
        entity.set_id(id);
        self.save(&entity)
    }

    async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        if self.remove::<E>(id)? {
            Ok(())
        } else {
            Err(ApiError::NotFound {
                resource: E::KIND.label().to_string(),
                id,
            })
        }
    }

    async fn set_status(&self, entity: &E, target: E::Status) -> Result<E, ApiError> {
        // The stored copy is authoritative, as it is for the REST backend.
        let mut stored: E = self.require(entity.id())?;
        stored.record_status(target, Utc::now());
        self.save(&stored)
    }
}

#[async_trait]
impl CategoryApi for FileStore {
    async fn list_categories(&self, active_only: bool) -> Result<Vec<Category>, ApiError> {
        let mut categories = self.load_categories()?;
        if active_only {
            categories.retain(|c| c.is_active);
        }
        Ok(categories)
    }

    async fn category_tree(&self, active_only: bool) -> Result<Vec<CategoryTreeNode>, ApiError> {
        let categories = self.list_categories(active_only).await?;
        Ok(build_tree(&categories))
    }

    async fn save_category(&self, category: &Category) -> Result<Category, ApiError> {
        let mut categories = self.load_categories()?;
        let mut saved = category.clone();
        let id = (saved.id != 0).then_some(saved.id);
        check_slug_available(&categories, id, &saved.slug)?;

        if saved.id == 0 {
            saved.id = categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
            categories.push(saved.clone());
        } else {
            let slot = categories
                .iter_mut()
                .find(|c| c.id == saved.id)
                .ok_or_else(|| ApiError::NotFound {
                    resource: "category".to_string(),
                    id: category.id,
                })?;
            *slot = saved.clone();
        }

        self.write_categories(&categories)?;
        Ok(saved)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        let mut categories = self.load_categories()?;
        if !categories.iter().any(|c| c.id == id) {
            return Err(ApiError::NotFound {
                resource: "category".to_string(),
                id,
            });
        }
        check_removal(&categories, id)?;

        categories.retain(|c| c.id != id);
        self.write_categories(&categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_content::{Expedition, ExpeditionStatus, Trek, TrekStatus};
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store")).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_per_collection() {
        let (_dir, store) = store();

        let a: Trek = store.create(&Trek::new("Annapurna Circuit", "annapurna")).await.unwrap();
        let b: Trek = store.create(&Trek::new("Langtang Valley", "langtang")).await.unwrap();
        let x: Expedition = store.create(&Expedition::new("Ama Dablam", "ama-dablam")).await.unwrap();

        assert_eq!((a.id, b.id, x.id), (1, 2, 1));
        assert!(store.store_dir().join("treks/2.json").exists());
        assert!(store.store_dir().join("expeditions/1.json").exists());
    }

    #[tokio::test]
    async fn get_missing_record_is_not_found() {
        let (_dir, store) = store();
        let err = ResourceApi::<Trek>::get(&store, 7).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { id: 7, .. }));
    }

    #[tokio::test]
    async fn list_filters_and_pages_newest_first() {
        let (_dir, store) = store();
        for name in ["Everest Base Camp", "Gokyo Lakes", "Everest Three Passes"] {
            store.create(&Trek::new(name, "")).await.unwrap();
        }
        let mut archived = Trek::new("Old Route", "old");
        archived.status = TrekStatus::Archived;
        store.create(&archived).await.unwrap();

        let page = ResourceApi::<Trek>::list(&store, &ListQuery::default().with_search("everest"))
            .await
            .unwrap();
        let names: Vec<&str> = page.items.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(page.total, 2);
        assert_eq!(names, vec!["Everest Three Passes", "Everest Base Camp"]);

        let query = ListQuery::default().with_status("draft").page(1, 1);
        let page = ResourceApi::<Trek>::list(&store, &query).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Gokyo Lakes");
        assert_eq!(page.limit, 1);
    }

    #[tokio::test]
    async fn set_status_stamps_stored_copy() {
        let (_dir, store) = store();
        let created: Expedition = store.create(&Expedition::new("Island Peak", "island-peak")).await.unwrap();

        let updated = store
            .set_status(&created, ExpeditionStatus::Archived)
            .await
            .unwrap();
        assert_eq!(updated.status, ExpeditionStatus::Archived);
        assert!(updated.updated_at.is_some());

        let reloaded = ResourceApi::<Expedition>::get(&store, created.id).await.unwrap();
        assert_eq!(reloaded.status, ExpeditionStatus::Archived);
    }

    #[tokio::test]
    async fn update_and_delete_require_existing_record() {
        let (_dir, store) = store();
        let err = store.update(3, &Trek::new("Ghost", "ghost")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));

        let created: Trek = store.create(&Trek::new("Manaslu", "manaslu")).await.unwrap();
        ResourceApi::<Trek>::delete(&store, created.id).await.unwrap();
        assert!(store.load::<Trek>(created.id).unwrap().is_none());
        assert!(ResourceApi::<Trek>::delete(&store, created.id).await.is_err());
    }

    #[tokio::test]
    async fn categories_are_saved_and_nested() {
        let (_dir, store) = store();
        let root = store
            .save_category(&Category::new(0, "Destinations", "destinations"))
            .await
            .unwrap();
        let mut hidden = Category::new(0, "Tibet", "tibet").with_parent(root.id);
        hidden.is_active = false;
        store.save_category(&hidden).await.unwrap();
        store
            .save_category(&Category::new(0, "Nepal", "nepal").with_parent(root.id))
            .await
            .unwrap();

        assert_eq!(store.list_categories(false).await.unwrap().len(), 3);
        let tree = store.category_tree(true).await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].category.name, "Nepal");
    }

    #[tokio::test]
    async fn duplicate_slug_is_refused_on_disk() {
        let (_dir, store) = store();
        let nepal = store
            .save_category(&Category::new(0, "Nepal", "nepal"))
            .await
            .unwrap();

        let err = store
            .save_category(&Category::new(0, "Nepal again", "nepal"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Integrity(_)));

        let mut renamed = nepal.clone();
        renamed.name = "Nepal Himalaya".into();
        store.save_category(&renamed).await.unwrap();

        let slugs: Vec<String> = store
            .list_categories(false)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.slug)
            .collect();
        assert_eq!(slugs, vec!["nepal"]);
    }

    #[tokio::test]
    async fn delete_category_keeps_parents_with_children() {
        let (_dir, store) = store();
        let root = store
            .save_category(&Category::new(0, "Destinations", "destinations"))
            .await
            .unwrap();
        let child = store
            .save_category(&Category::new(0, "Nepal", "nepal").with_parent(root.id))
            .await
            .unwrap();

        let err = store.delete_category(root.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Integrity(_)));

        store.delete_category(child.id).await.unwrap();
        store.delete_category(root.id).await.unwrap();
        assert!(store.list_categories(false).await.unwrap().is_empty());

        let err = store.delete_category(root.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn updating_unknown_category_is_not_found() {
        let (_dir, store) = store();
        let err = store
            .save_category(&Category::new(9, "Nowhere", "nowhere"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { id: 9, .. }));
    }
}
