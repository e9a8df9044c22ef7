// readiness.rs - Publish-readiness checklist.
//
// The checklist runs in a fixed order and never short-circuits: every
// failing rule contributes one reason so the caller can show the whole
// list at once.

use serde::{Deserialize, Serialize};

use crate::entity::{PublishFacts, Publishable};
use crate::status::EntityKind;

/// One line of the publish-readiness checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessRule {
    Name,
    Description,
    FeaturedImage,
    Location,
    Price,
    Duration,
    /// Trek only.
    MaxAltitude,
    ItineraryPresent,
    ItineraryDayDetails,
    ItinerarySequence,
    GroupSizeMin,
    GroupSizeRange,
    Season,
}

impl ReadinessRule {
    /// Evaluation order.
    pub const ORDER: &'static [ReadinessRule] = &[
        ReadinessRule::Name,
        ReadinessRule::Description,
        ReadinessRule::FeaturedImage,
        ReadinessRule::Location,
        ReadinessRule::Price,
        ReadinessRule::Duration,
        ReadinessRule::MaxAltitude,
        ReadinessRule::ItineraryPresent,
        ReadinessRule::ItineraryDayDetails,
        ReadinessRule::ItinerarySequence,
        ReadinessRule::GroupSizeMin,
        ReadinessRule::GroupSizeRange,
        ReadinessRule::Season,
    ];

    /// `None` when the rule passes or does not apply; otherwise the reason.
    pub fn check(self, facts: &PublishFacts<'_>) -> Option<String> {
        let failed = match self {
            ReadinessRule::Name => is_blank(facts.name),
            ReadinessRule::Description => is_blank(facts.description),
            ReadinessRule::FeaturedImage => facts.featured_image.map_or(true, is_blank),
            ReadinessRule::Location => is_blank(facts.location),
            // Written as a negated comparison so NaN fails.
            ReadinessRule::Price => !(facts.price > 0.0),
            ReadinessRule::Duration => facts.duration <= 0,
            ReadinessRule::MaxAltitude => facts.max_altitude.is_some_and(|alt| alt <= 0),
            ReadinessRule::ItineraryPresent => facts.itinerary.is_empty(),
            // Per-day rules only make sense once there is at least one day;
            // an empty itinerary reports through ItineraryPresent alone.
            ReadinessRule::ItineraryDayDetails => facts
                .itinerary
                .iter()
                .any(|day| is_blank(&day.title) || is_blank(&day.description)),
            ReadinessRule::ItinerarySequence => {
                !facts.itinerary.is_empty()
                    && !is_contiguous_from_one(
                        &facts.itinerary.iter().map(|d| d.day).collect::<Vec<_>>(),
                    )
            }
            ReadinessRule::GroupSizeMin => facts.group_size_min <= 0,
            ReadinessRule::GroupSizeRange => facts.group_size_max < facts.group_size_min,
            ReadinessRule::Season => facts.seasons.iter().all(|s| is_blank(s)),
        };
        failed.then(|| self.reason(facts.kind))
    }

    fn reason(self, kind: EntityKind) -> String {
        let label = kind.label();
        match self {
            ReadinessRule::Name => format!("{label} name is required"),
            ReadinessRule::Description => format!("{label} description is required"),
            ReadinessRule::FeaturedImage => "Featured image is required".into(),
            ReadinessRule::Location => "Location is required".into(),
            ReadinessRule::Price => "Valid price is required".into(),
            ReadinessRule::Duration => "Valid duration is required".into(),
            ReadinessRule::MaxAltitude => "Valid maximum altitude is required".into(),
            ReadinessRule::ItineraryPresent => "At least one itinerary day is required".into(),
            ReadinessRule::ItineraryDayDetails => {
                "All itinerary days must have title and description".into()
            }
            ReadinessRule::ItinerarySequence => {
                "Itinerary days must be sequential starting from 1".into()
            }
            ReadinessRule::GroupSizeMin => "Minimum group size must be greater than 0".into(),
            ReadinessRule::GroupSizeRange => {
                "Maximum group size must be greater than or equal to minimum".into()
            }
            ReadinessRule::Season => match kind {
                EntityKind::Trek => "At least one best season is required".into(),
                EntityKind::Expedition => "At least one season is required".into(),
            },
        }
    }
}

/// Result of the checklist, serialized as `{ "canPublish": bool, "reasons": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReport {
    pub can_publish: bool,
    pub reasons: Vec<String>,
    /// Rules behind `reasons`, index for index. Not part of the wire shape.
    #[serde(skip)]
    pub failed: Vec<ReadinessRule>,
}

impl ReadinessReport {
    pub fn failed_rule(&self, rule: ReadinessRule) -> bool {
        self.failed.contains(&rule)
    }
}

/// Run the full checklist against a borrowed view of an entity.
pub fn check_facts(facts: &PublishFacts<'_>) -> ReadinessReport {
    let mut report = ReadinessReport::default();
    for rule in ReadinessRule::ORDER {
        if let Some(reason) = rule.check(facts) {
            report.failed.push(*rule);
            report.reasons.push(reason);
        }
    }
    report.can_publish = report.reasons.is_empty();
    report
}

/// Run the full checklist against a publishable entity.
pub fn validate_publish_readiness<E: Publishable>(entity: &E) -> ReadinessReport {
    let report = check_facts(&entity.publish_facts());
    tracing::debug!(
        kind = %E::KIND,
        id = entity.id(),
        can_publish = report.can_publish,
        failures = report.reasons.len(),
        "evaluated publish readiness"
    );
    report
}

/// Day numbers, in any order, must be exactly `1..=n`.
pub fn is_contiguous_from_one(days: &[i32]) -> bool {
    let mut sorted = days.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .enumerate()
        .all(|(i, day)| i64::from(*day) == i as i64 + 1)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
