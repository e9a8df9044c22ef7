//! # bc-content
//!
//! Publishing lifecycle for basecamp treks and expeditions.
//!
//! Both entity kinds move through a closed set of statuses. Moves are
//! checked against a fixed transition table, and moving to `published`
//! additionally requires the entity to pass the publish-readiness
//! checklist. Everything here is synchronous and side-effect free apart
//! from the JSONL [`LogSink`].
//!
//! ## Key components
//!
//! - [`TrekStatus`] / [`ExpeditionStatus`]: the status alphabets, each
//!   implementing [`Lifecycle`] with its transition table
//! - [`Trek`] / [`Expedition`]: records implementing [`Publishable`]
//! - [`validate_publish_readiness`]: the ordered checklist, reporting
//!   every unmet rule in one pass
//! - [`evaluate_transition`]: table lookup plus publish gate, as a
//!   [`TransitionVerdict`]
//! - [`ContentEvent`] / [`EventDispatcher`]: events emitted around
//!   status changes

pub mod entity;
pub mod error;
pub mod events;
pub mod readiness;
pub mod status;
pub mod transition;

pub use entity::{EntityId, Expedition, GroupSize, ItineraryDay, PublishFacts, Publishable, Trek};
pub use error::ContentError;
pub use events::{ContentEvent, EventDispatcher, LogSink, NotificationSink};
pub use readiness::{
    check_facts, is_contiguous_from_one, validate_publish_readiness, ReadinessReport,
    ReadinessRule,
};
pub use status::{
    can_transition, EntityKind, ExpeditionStatus, Lifecycle, TransitionCheck, TrekStatus,
};
pub use transition::{evaluate_transition, TransitionVerdict};
