// entity.rs - Publishable records: Trek, Expedition, and their itineraries.
//
// The records are owned by the CRUD collaborator. This crate only reads
// them to decide transitions and records a new status once the
// collaborator has been asked to persist it.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::status::{EntityKind, ExpeditionStatus, Lifecycle, TrekStatus};

/// Numeric identity assigned by the CRUD collaborator.
pub type EntityId = i64;

/// One day of an itinerary.
///
/// Day numbers are only checked when the parent is published: they must
/// then be unique and contiguous from 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub day: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meals: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<String>,
}

impl ItineraryDay {
    pub fn new(day: i32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            day,
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// Borrowed view of everything the publish-readiness checklist looks at.
///
/// `max_altitude` is `None` for entity kinds that carry no altitude rule.
#[derive(Debug, Clone, Copy)]
pub struct PublishFacts<'a> {
    pub kind: EntityKind,
    pub name: &'a str,
    pub description: &'a str,
    pub featured_image: Option<&'a str>,
    pub location: &'a str,
    pub price: f64,
    pub duration: i32,
    pub max_altitude: Option<i32>,
    pub itinerary: &'a [ItineraryDay],
    pub group_size_min: i32,
    pub group_size_max: i32,
    pub seasons: &'a [String],
}

/// A record subject to the status lifecycle.
pub trait Publishable: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Status: Lifecycle;

    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    /// Assigned by the collaborator on create.
    fn set_id(&mut self, id: EntityId);

    fn name(&self) -> &str;

    fn status(&self) -> Self::Status;

    /// Record a status the collaborator has accepted.
    ///
    /// Stamps `updated_at`, and `published_at` when the new status is the
    /// published state.
    fn record_status(&mut self, status: Self::Status, at: DateTime<Utc>);

    fn publish_facts(&self) -> PublishFacts<'_>;
}

/// A multi-day trekking product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trek {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub max_altitude: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub status: TrekStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub best_season: Vec<String>,
    #[serde(default)]
    pub group_size_min: i32,
    #[serde(default)]
    pub group_size_max: i32,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

impl Trek {
    /// A new trek in the initial (draft) state, not yet persisted.
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            status: TrekStatus::INITIAL,
            ..Default::default()
        }
    }
}

impl Publishable for Trek {
    type Status = TrekStatus;

    const KIND: EntityKind = EntityKind::Trek;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> TrekStatus {
        self.status
    }

    fn record_status(&mut self, status: TrekStatus, at: DateTime<Utc>) {
        let stamp = at.to_rfc3339();
        if status.is_published() {
            self.published_at = Some(stamp.clone());
        }
        self.status = status;
        self.updated_at = Some(stamp);
    }

    fn publish_facts(&self) -> PublishFacts<'_> {
        PublishFacts {
            kind: EntityKind::Trek,
            name: &self.name,
            description: &self.description,
            featured_image: self.featured_image.as_deref(),
            location: &self.location,
            price: self.price,
            duration: self.duration,
            max_altitude: Some(self.max_altitude),
            itinerary: &self.itinerary,
            group_size_min: self.group_size_min,
            group_size_max: self.group_size_max,
            seasons: &self.best_season,
        }
    }
}

/// Group-size bounds as the expedition API nests them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSize {
    pub min: i32,
    pub max: i32,
}

/// A technical, summit-oriented product. The expedition API speaks camelCase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expedition {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub summit_altitude: i32,
    #[serde(default)]
    pub base_altitude: i32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub group_size: GroupSize,
    #[serde(default)]
    pub season: Vec<String>,
    /// Featured image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: ExpeditionStatus,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default, rename = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updated_at", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, rename = "published_at", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

impl Expedition {
    /// A new expedition in the initial (draft) state, not yet persisted.
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            status: ExpeditionStatus::INITIAL,
            ..Default::default()
        }
    }
}

impl Publishable for Expedition {
    type Status = ExpeditionStatus;

    const KIND: EntityKind = EntityKind::Expedition;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> ExpeditionStatus {
        self.status
    }

    fn record_status(&mut self, status: ExpeditionStatus, at: DateTime<Utc>) {
        let stamp = at.to_rfc3339();
        if status.is_published() {
            self.published_at = Some(stamp.clone());
        }
        self.status = status;
        self.updated_at = Some(stamp);
    }

    fn publish_facts(&self) -> PublishFacts<'_> {
        PublishFacts {
            kind: EntityKind::Expedition,
            name: &self.name,
            description: &self.description,
            featured_image: self.image.as_deref(),
            location: &self.location,
            price: self.price,
            duration: self.duration,
            max_altitude: None,
            itinerary: &self.itinerary,
            group_size_min: self.group_size.min,
            group_size_max: self.group_size.max,
            seasons: &self.season,
        }
    }
}
