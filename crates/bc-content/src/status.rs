// status.rs - Closed status alphabets and their transition tables.
//
// Treks and Expeditions share the same lifecycle shape with different
// alphabets:
//
//   Trek:        draft → {published, archived}
//                published → {draft, archived, seasonal}
//                archived → {draft, published}
//                seasonal → {published, archived}
//
//   Expedition:  draft → {published, archived}
//                published → {draft, archived}
//                archived → {draft, published}
//
// New entities start in `draft`. There is no terminal state.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// The two kinds of publishable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Trek,
    Expedition,
}

impl EntityKind {
    /// Human-readable label used in readiness reasons ("Trek name is required").
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Trek => "Trek",
            EntityKind::Expedition => "Expedition",
        }
    }

    /// Collection segment used by the REST routes and the file store.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Trek => "treks",
            EntityKind::Expedition => "expeditions",
        }
    }

    /// Table lookup over raw status strings for this kind.
    ///
    /// Unknown values on either side report `false`.
    pub fn can_transition(self, current: &str, target: &str) -> bool {
        match self {
            EntityKind::Trek => can_transition::<TrekStatus>(current, target),
            EntityKind::Expedition => can_transition::<ExpeditionStatus>(current, target),
        }
    }

    /// Every legal status value for this kind, in declaration order.
    pub fn statuses(self) -> Vec<&'static str> {
        match self {
            EntityKind::Trek => TrekStatus::ALL.iter().map(|s| s.as_str()).collect(),
            EntityKind::Expedition => ExpeditionStatus::ALL.iter().map(|s| s.as_str()).collect(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Trek => write!(f, "trek"),
            EntityKind::Expedition => write!(f, "expedition"),
        }
    }
}

/// A closed status enumeration with a fixed transition table.
///
/// The table lives in [`Lifecycle::allowed_targets`], written as an
/// exhaustive `match` so adding a variant fails to compile until every
/// state says where it may go.
pub trait Lifecycle:
    Copy
    + Eq
    + fmt::Debug
    + fmt::Display
    + FromStr<Err = ContentError>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Which entity kind this alphabet belongs to.
    const KIND: EntityKind;
    /// Every variant, in declaration order.
    const ALL: &'static [Self];
    /// State assigned on creation.
    const INITIAL: Self;
    /// The state gated behind the publish-readiness checklist.
    const PUBLISHED: Self;

    fn as_str(self) -> &'static str;

    /// Targets reachable in one step from `self`.
    fn allowed_targets(self) -> &'static [Self];

    fn can_transition_to(self, next: Self) -> bool {
        self.allowed_targets().contains(&next)
    }

    fn is_published(self) -> bool {
        self == Self::PUBLISHED
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == value)
    }
}

/// Pure table lookup over raw strings. Never errors: an unknown current
/// or target value is simply not a legal transition.
pub fn can_transition<S: Lifecycle>(current: &str, target: &str) -> bool {
    match (S::parse(current), S::parse(target)) {
        (Some(from), Some(to)) => from.can_transition_to(to),
        _ => false,
    }
}

/// `{ "allowed": bool }` as surfaced to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCheck {
    pub allowed: bool,
}

impl TransitionCheck {
    pub fn of(kind: EntityKind, current: &str, target: &str) -> Self {
        Self {
            allowed: kind.can_transition(current, target),
        }
    }
}

/// Lifecycle state of a Trek.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrekStatus {
    #[default]
    Draft,
    Published,
    Archived,
    /// Published but only bookable in its listed seasons.
    Seasonal,
}

impl Lifecycle for TrekStatus {
    const KIND: EntityKind = EntityKind::Trek;
    const ALL: &'static [Self] = &[
        TrekStatus::Draft,
        TrekStatus::Published,
        TrekStatus::Archived,
        TrekStatus::Seasonal,
    ];
    const INITIAL: Self = TrekStatus::Draft;
    const PUBLISHED: Self = TrekStatus::Published;

    fn as_str(self) -> &'static str {
        match self {
            TrekStatus::Draft => "draft",
            TrekStatus::Published => "published",
            TrekStatus::Archived => "archived",
            TrekStatus::Seasonal => "seasonal",
        }
    }

    fn allowed_targets(self) -> &'static [Self] {
        use TrekStatus::*;
        match self {
            Draft => &[Published, Archived],
            Published => &[Draft, Archived, Seasonal],
            Archived => &[Draft, Published],
            Seasonal => &[Published, Archived],
        }
    }
}

/// Lifecycle state of an Expedition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpeditionStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl Lifecycle for ExpeditionStatus {
    const KIND: EntityKind = EntityKind::Expedition;
    const ALL: &'static [Self] = &[
        ExpeditionStatus::Draft,
        ExpeditionStatus::Published,
        ExpeditionStatus::Archived,
    ];
    const INITIAL: Self = ExpeditionStatus::Draft;
    const PUBLISHED: Self = ExpeditionStatus::Published;

    fn as_str(self) -> &'static str {
        match self {
            ExpeditionStatus::Draft => "draft",
            ExpeditionStatus::Published => "published",
            ExpeditionStatus::Archived => "archived",
        }
    }

    fn allowed_targets(self) -> &'static [Self] {
        use ExpeditionStatus::*;
        match self {
            Draft => &[Published, Archived],
            Published => &[Draft, Archived],
            Archived => &[Draft, Published],
        }
    }
}

macro_rules! status_text_impls {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ContentError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Lifecycle>::parse(s).ok_or_else(|| ContentError::UnknownStatus {
                    kind: <$ty as Lifecycle>::KIND,
                    value: s.to_string(),
                })
            }
        }
    };
}

status_text_impls!(TrekStatus);
status_text_impls!(ExpeditionStatus);
