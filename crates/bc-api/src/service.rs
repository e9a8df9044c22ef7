// service.rs - Orchestration over the CRUD collaborators.
//
// LifecycleService answers "may this entity move to that status?" and,
// when the answer is yes, asks the collaborator to persist it. A rejected
// request never reaches the writer. Either way exactly one event is
// dispatched. There is no locking or retry: the collaborator's last write
// wins.
//
// CategoryService fetches one flat snapshot and derives the nested and
// flattened views from it. Category writes and deletes are gated on field
// rules, slug uniqueness and parent integrity, all checked against a
// fresh snapshot.

use bc_content::{
    evaluate_transition, validate_publish_readiness, ContentEvent, EntityId, EntityKind,
    EventDispatcher, Publishable, ReadinessReport, TransitionCheck, TransitionVerdict,
};
use bc_taxonomy::{
    build_tree, check_parent_assignment, check_removal, check_slug_available, exclude_category,
    find_cycles, flatten_tree, validate_category, Category, CategoryId, CategoryTreeNode,
    FlatEntry,
};
use serde::Serialize;

use crate::api::{CategoryApi, ResourceApi};
use crate::error::ApiError;

/// Result of a status change request.
#[derive(Debug, Clone)]
pub enum TransitionOutcome<E: Publishable> {
    /// The collaborator persisted the new status; `entity` is its copy.
    Applied { entity: E, from: E::Status },
    /// Refused before any write.
    Rejected(TransitionVerdict<E::Status>),
}

impl<E: Publishable> TransitionOutcome<E> {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied { .. })
    }

    /// Reasons for a rejection; empty when applied.
    pub fn reasons(&self) -> &[String] {
        match self {
            TransitionOutcome::Applied { .. } => &[],
            TransitionOutcome::Rejected(verdict) => &verdict.reasons,
        }
    }
}

/// Status changes for treks and expeditions.
pub struct LifecycleService<A> {
    api: A,
    events: EventDispatcher,
}

impl<A> LifecycleService<A> {
    /// A service with no event sinks.
    pub fn new(api: A) -> Self {
        Self::with_dispatcher(api, EventDispatcher::new())
    }

    pub fn with_dispatcher(api: A, events: EventDispatcher) -> Self {
        Self { api, events }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Pure table lookup over raw status strings; no fetch, no readiness.
    pub fn check(&self, kind: EntityKind, current: &str, target: &str) -> TransitionCheck {
        TransitionCheck::of(kind, current, target)
    }

    /// Fetch an entity and run the publish-readiness checklist on it.
    pub async fn readiness<E>(&self, id: EntityId) -> Result<ReadinessReport, ApiError>
    where
        E: Publishable,
        A: ResourceApi<E>,
    {
        let entity = self.api.get(id).await?;
        Ok(validate_publish_readiness(&entity))
    }

    /// Fetch, evaluate, and persist only if the verdict allows it.
    pub async fn transition<E>(
        &self,
        id: EntityId,
        target: E::Status,
    ) -> Result<TransitionOutcome<E>, ApiError>
    where
        E: Publishable,
        A: ResourceApi<E>,
    {
        let entity: E = self.api.get(id).await?;
        let verdict = evaluate_transition(&entity, target);

        if !verdict.allowed {
            tracing::warn!(
                kind = %E::KIND,
                id,
                from = %verdict.from,
                to = %verdict.to,
                reasons = ?verdict.reasons,
                "status change rejected"
            );
            self.events.dispatch(&ContentEvent::rejected(id, &verdict));
            return Ok(TransitionOutcome::Rejected(verdict));
        }

        let from = verdict.from;
        let updated = self.api.set_status(&entity, target).await?;
        tracing::info!(kind = %E::KIND, id, %from, to = %target, name = updated.name(), "status changed");
        self.events
            .dispatch(&ContentEvent::status_changed(id, from, target));

        Ok(TransitionOutcome::Applied {
            entity: updated,
            from,
        })
    }
}

/// One category fetch with both derived views.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySnapshot {
    pub categories: Vec<Category>,
    pub tree: Vec<CategoryTreeNode>,
    /// Parent-link loops found in `categories`; their members are absent
    /// from `tree`.
    pub cycles: Vec<Vec<CategoryId>>,
}

impl CategorySnapshot {
    pub fn from_categories(categories: Vec<Category>) -> Self {
        let tree = build_tree(&categories);
        let cycles = find_cycles(&categories);
        Self {
            categories,
            tree,
            cycles,
        }
    }

    /// Selector options, minus the category being edited.
    ///
    /// Only the edited row itself is removed; its descendants stay and
    /// are rejected at save time if chosen as its parent.
    pub fn options(&self, editing: Option<CategoryId>) -> Vec<FlatEntry> {
        let entries = flatten_tree(&self.tree, 0);
        match editing {
            Some(id) => exclude_category(entries, id),
            None => entries,
        }
    }
}

/// Result of a category save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryWrite {
    Saved(Category),
    /// Nothing was written.
    Rejected(Vec<String>),
}

/// Result of a category delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryDelete {
    Deleted(CategoryId),
    /// Nothing was removed.
    Rejected(Vec<String>),
}

/// Category reads and gated writes.
pub struct CategoryService<A> {
    api: A,
}

impl<A: CategoryApi> CategoryService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn snapshot(&self, active_only: bool) -> Result<CategorySnapshot, ApiError> {
        let categories = self.api.list_categories(active_only).await?;
        let snapshot = CategorySnapshot::from_categories(categories);
        if !snapshot.cycles.is_empty() {
            tracing::warn!(cycles = ?snapshot.cycles, "category snapshot contains parent loops");
        }
        Ok(snapshot)
    }

    /// Validate and write a category (id 0 creates).
    pub async fn save(&self, category: &Category) -> Result<CategoryWrite, ApiError> {
        let mut reasons = validate_category(category);

        // Inactive categories still count as parents.
        let current = self.api.list_categories(false).await?;
        let id = (category.id != 0).then_some(category.id);
        if let Err(e) = check_slug_available(&current, id, &category.slug) {
            reasons.push(e.to_string());
        }
        if let Err(e) = check_parent_assignment(&current, id, category.parent_id) {
            reasons.push(e.to_string());
        }

        if !reasons.is_empty() {
            tracing::warn!(slug = %category.slug, ?reasons, "category write rejected");
            return Ok(CategoryWrite::Rejected(reasons));
        }

        let saved = self.api.save_category(category).await?;
        tracing::info!(id = saved.id, slug = %saved.slug, "category saved");
        Ok(CategoryWrite::Saved(saved))
    }

    /// Delete a category that no other category points at.
    pub async fn delete(&self, id: CategoryId) -> Result<CategoryDelete, ApiError> {
        let current = self.api.list_categories(false).await?;
        if !current.iter().any(|c| c.id == id) {
            return Err(ApiError::NotFound {
                resource: "category".to_string(),
                id,
            });
        }
        if let Err(e) = check_removal(&current, id) {
            tracing::warn!(id, error = %e, "category delete rejected");
            return Ok(CategoryDelete::Rejected(vec![e.to_string()]));
        }

        self.api.delete_category(id).await?;
        tracing::info!(id, "category deleted");
        Ok(CategoryDelete::Deleted(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileStore;
    use bc_content::{
        ContentError, Expedition, ItineraryDay, NotificationSink, Trek, TrekStatus,
    };
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct RecordingSink {
        events: Arc<Mutex<Vec<ContentEvent>>>,
    }

    impl NotificationSink for RecordingSink {
        fn send(&self, event: &ContentEvent) -> Result<(), ContentError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn ready_trek() -> Trek {
        let mut trek = Trek::new("Everest Base Camp", "everest-base-camp");
        trek.description = "Classic route to the foot of Everest.".into();
        trek.featured_image = Some("/media/ebc.jpg".into());
        trek.location = "Khumbu".into();
        trek.price = 1450.0;
        trek.duration = 2;
        trek.max_altitude = 5364;
        trek.group_size_min = 2;
        trek.group_size_max = 12;
        trek.best_season = vec!["spring".into()];
        trek.itinerary = vec![
            ItineraryDay::new(1, "Lukla to Phakding", "Fly in and walk down the valley."),
            ItineraryDay::new(2, "Phakding to Namche", "Climb to the Sherpa capital."),
        ];
        trek
    }

    fn service(store: FileStore) -> (LifecycleService<FileStore>, RecordingSink) {
        let sink = RecordingSink::default();
        let events = EventDispatcher::new().with_sink(Box::new(sink.clone()));
        (LifecycleService::with_dispatcher(store, events), sink)
    }

    #[tokio::test]
    async fn publish_ready_trek_is_applied_and_announced() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        let trek: Trek = store.create(&ready_trek()).await.unwrap();
        let (service, sink) = service(store);

        let outcome = service
            .transition::<Trek>(trek.id, TrekStatus::Published)
            .await
            .unwrap();

        match outcome {
            TransitionOutcome::Applied { entity, from } => {
                assert_eq!(from, TrekStatus::Draft);
                assert_eq!(entity.status, TrekStatus::Published);
                assert!(entity.published_at.is_some());
            }
            TransitionOutcome::Rejected(verdict) => panic!("rejected: {:?}", verdict.reasons),
        }
        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "status_changed");
    }

    #[tokio::test]
    async fn rejected_publish_never_writes() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        let mut draft = ready_trek();
        draft.itinerary.clear();
        let trek: Trek = store.create(&draft).await.unwrap();
        let (service, sink) = service(store);

        let outcome = service
            .transition::<Trek>(trek.id, TrekStatus::Published)
            .await
            .unwrap();

        assert!(!outcome.is_applied());
        assert_eq!(outcome.reasons(), ["At least one itinerary day is required"]);
        let stored = service.api().load::<Trek>(trek.id).unwrap().unwrap();
        assert_eq!(stored.status, TrekStatus::Draft);
        assert!(stored.updated_at.is_none());
        assert_eq!(sink.events.lock().unwrap()[0].event_type(), "transition_rejected");
    }

    #[tokio::test]
    async fn illegal_move_is_rejected_by_table() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        let mut archived = ready_trek();
        archived.status = TrekStatus::Archived;
        let trek: Trek = store.create(&archived).await.unwrap();
        let (service, _sink) = service(store);

        let outcome = service
            .transition::<Trek>(trek.id, TrekStatus::Seasonal)
            .await
            .unwrap();
        assert_eq!(
            outcome.reasons(),
            ["Cannot change trek status from archived to seasonal"]
        );
    }

    #[tokio::test]
    async fn readiness_reports_every_gap() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        let expedition: Expedition = store
            .create(&Expedition::new("Ama Dablam", "ama-dablam"))
            .await
            .unwrap();
        let (service, _sink) = service(store);

        let report = service.readiness::<Expedition>(expedition.id).await.unwrap();
        assert!(!report.can_publish);
        assert!(report.reasons.len() > 1);
        assert_eq!(report.reasons[0], "Expedition description is required");
    }

    #[tokio::test]
    async fn missing_entity_is_an_error() {
        let dir = tempdir().unwrap();
        let (service, sink) = service(FileStore::new(dir.path()).unwrap());

        let err = service
            .transition::<Trek>(42, TrekStatus::Archived)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { id: 42, .. }));
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[test]
    fn check_is_a_pure_lookup() {
        let dir = tempdir().unwrap();
        let service = LifecycleService::new(FileStore::new(dir.path()).unwrap());
        assert!(service.check(EntityKind::Trek, "published", "seasonal").allowed);
        assert!(!service.check(EntityKind::Trek, "draft", "seasonal").allowed);
        assert!(!service.check(EntityKind::Expedition, "draft", "seasonal").allowed);
        assert!(!service.check(EntityKind::Trek, "bogus", "draft").allowed);
    }

    #[tokio::test]
    async fn category_save_rejects_bad_draft_and_loops() {
        let dir = tempdir().unwrap();
        let service = CategoryService::new(FileStore::new(dir.path()).unwrap());

        let root = match service
            .save(&Category::new(0, "Himalaya", "himalaya"))
            .await
            .unwrap()
        {
            CategoryWrite::Saved(c) => c,
            CategoryWrite::Rejected(r) => panic!("rejected: {r:?}"),
        };
        let child = match service
            .save(&Category::new(0, "Khumbu", "khumbu").with_parent(root.id))
            .await
            .unwrap()
        {
            CategoryWrite::Saved(c) => c,
            CategoryWrite::Rejected(r) => panic!("rejected: {r:?}"),
        };

        let looped = root.clone().with_parent(child.id);
        let CategoryWrite::Rejected(reasons) = service.save(&looped).await.unwrap() else {
            panic!("loop was accepted");
        };
        assert_eq!(
            reasons,
            vec![format!(
                "category {} is a descendant of {} and cannot become its parent",
                child.id, root.id
            )]
        );

        let bad = Category::new(0, "", "Bad Slug").with_parent(99);
        let CategoryWrite::Rejected(reasons) = service.save(&bad).await.unwrap() else {
            panic!("bad draft was accepted");
        };
        assert_eq!(reasons.len(), 3);
        assert_eq!(reasons[2], "parent category 99 not found");
    }

    #[tokio::test]
    async fn category_save_rejects_taken_slug_but_keeps_own() {
        let dir = tempdir().unwrap();
        let service = CategoryService::new(FileStore::new(dir.path()).unwrap());

        let CategoryWrite::Saved(nepal) = service
            .save(&Category::new(0, "Nepal", "nepal"))
            .await
            .unwrap()
        else {
            panic!("first save was rejected");
        };

        let CategoryWrite::Rejected(reasons) = service
            .save(&Category::new(0, "Nepal again", "nepal"))
            .await
            .unwrap()
        else {
            panic!("duplicate slug was accepted");
        };
        assert_eq!(
            reasons,
            vec!["Category with this slug already exists: 'nepal'"]
        );

        let mut renamed = nepal.clone();
        renamed.name = "Nepal Himalaya".into();
        assert!(matches!(
            service.save(&renamed).await.unwrap(),
            CategoryWrite::Saved(_)
        ));

        let slugs: Vec<String> = service
            .snapshot(false)
            .await
            .unwrap()
            .categories
            .into_iter()
            .map(|c| c.slug)
            .collect();
        assert_eq!(slugs, vec!["nepal"]);
    }

    #[tokio::test]
    async fn category_delete_waits_for_children() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store
            .write_categories(&[
                Category::new(1, "Destinations", "destinations"),
                Category::new(2, "Nepal", "nepal").with_parent(1),
            ])
            .unwrap();
        let service = CategoryService::new(store);

        let CategoryDelete::Rejected(reasons) = service.delete(1).await.unwrap() else {
            panic!("parent with children was deleted");
        };
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].starts_with("Cannot delete category with children"));
        assert_eq!(service.snapshot(false).await.unwrap().categories.len(), 2);

        assert_eq!(service.delete(2).await.unwrap(), CategoryDelete::Deleted(2));
        assert_eq!(service.delete(1).await.unwrap(), CategoryDelete::Deleted(1));
        assert!(matches!(
            service.delete(1).await.unwrap_err(),
            ApiError::NotFound { id: 1, .. }
        ));
    }

    #[tokio::test]
    async fn snapshot_derives_tree_and_options_from_one_fetch() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store
            .write_categories(&[
                Category::new(1, "Destinations", "destinations"),
                Category::new(2, "Nepal", "nepal").with_parent(1),
                Category::new(3, "Bhutan", "bhutan").with_parent(1).with_order(1),
                Category::new(4, "Loop A", "loop-a").with_parent(5),
                Category::new(5, "Loop B", "loop-b").with_parent(4),
            ])
            .unwrap();
        let service = CategoryService::new(store);

        let snapshot = service.snapshot(false).await.unwrap();
        assert_eq!(snapshot.categories.len(), 5);
        assert_eq!(snapshot.tree.len(), 1);
        assert_eq!(snapshot.cycles, vec![vec![4, 5]]);

        let paths: Vec<String> = snapshot
            .options(Some(2))
            .into_iter()
            .map(|e| e.full_path)
            .collect();
        assert_eq!(paths, vec!["Destinations", "— Bhutan"]);
    }
}
