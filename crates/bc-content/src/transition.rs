// transition.rs - Transition verdicts: table lookup plus the publish gate.
//
// A verdict is computed from data already in memory. The caller persists
// the new status only when `allowed` is true; a rejected verdict never
// touches the stored entity.

use serde::{Deserialize, Serialize};

use crate::entity::Publishable;
use crate::readiness::validate_publish_readiness;
use crate::status::{EntityKind, Lifecycle};

/// Outcome of asking whether an entity may move to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "S: Lifecycle")]
pub struct TransitionVerdict<S> {
    pub kind: EntityKind,
    pub from: S,
    pub to: S,
    pub allowed: bool,
    /// Empty when allowed. One entry for an illegal transition, or every
    /// unmet readiness rule for a blocked publish.
    pub reasons: Vec<String>,
}

impl<S: Lifecycle> TransitionVerdict<S> {
    /// Whether the rejection came from the readiness gate rather than the table.
    pub fn blocked_by_readiness(&self) -> bool {
        !self.allowed && self.from.can_transition_to(self.to)
    }
}

/// Decide whether `entity` may move to `target`.
///
/// The transition table is consulted first; the readiness checklist only
/// runs when the table allows the move and the target is the published
/// state.
pub fn evaluate_transition<E: Publishable>(
    entity: &E,
    target: E::Status,
) -> TransitionVerdict<E::Status> {
    let from = entity.status();

    if !from.can_transition_to(target) {
        tracing::debug!(kind = %E::KIND, id = entity.id(), %from, to = %target, "transition not in table");
        return TransitionVerdict {
            kind: E::KIND,
            from,
            to: target,
            allowed: false,
            reasons: vec![format!(
                "Cannot change {} status from {} to {}",
                E::KIND,
                from,
                target
            )],
        };
    }

    let reasons = if target.is_published() {
        validate_publish_readiness(entity).reasons
    } else {
        Vec::new()
    };

    TransitionVerdict {
        kind: E::KIND,
        from,
        to: target,
        allowed: reasons.is_empty(),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Expedition, ItineraryDay, Trek};
    use crate::status::{ExpeditionStatus, TrekStatus};

    fn draft_trek_without_itinerary() -> Trek {
        let mut trek = Trek::new("Mardi Himal", "mardi-himal");
        trek.id = 12;
        trek.description = "Short ridge trek".into();
        trek.featured_image = Some("https://cdn.example.com/mardi.jpg".into());
        trek.location = "Kaski".into();
        trek.price = 650.0;
        trek.duration = 5;
        trek.max_altitude = 4500;
        trek.group_size_min = 1;
        trek.group_size_max = 12;
        trek.best_season = vec!["spring".into()];
        trek
    }

    #[test]
    fn publish_blocked_by_missing_itinerary() {
        let trek = draft_trek_without_itinerary();
        let verdict = evaluate_transition(&trek, TrekStatus::Published);
        assert!(!verdict.allowed);
        assert!(verdict.blocked_by_readiness());
        assert_eq!(verdict.reasons.len(), 1);
        assert!(verdict.reasons[0].contains("itinerary"));
    }

    #[test]
    fn draft_can_be_archived_without_readiness_gate() {
        let trek = draft_trek_without_itinerary();
        let verdict = evaluate_transition(&trek, TrekStatus::Archived);
        assert!(verdict.allowed);
        assert!(verdict.reasons.is_empty());
    }

    #[test]
    fn illegal_transition_has_single_reason_and_skips_checklist() {
        // Empty entity: the checklist would report many failures.
        let trek = Trek::new("", "");
        let verdict = evaluate_transition(&trek, TrekStatus::Seasonal);
        assert!(!verdict.allowed);
        assert!(!verdict.blocked_by_readiness());
        assert_eq!(
            verdict.reasons,
            vec!["Cannot change trek status from draft to seasonal"]
        );
    }

    #[test]
    fn publish_allowed_once_itinerary_added() {
        let mut trek = draft_trek_without_itinerary();
        trek.itinerary = (1..=5)
            .map(|d| ItineraryDay::new(d, format!("Day {d}"), "Walk"))
            .collect();
        let verdict = evaluate_transition(&trek, TrekStatus::Published);
        assert!(verdict.allowed, "{:?}", verdict.reasons);
    }

    #[test]
    fn seasonal_trek_can_be_republished_only_when_ready() {
        let mut trek = draft_trek_without_itinerary();
        trek.status = TrekStatus::Seasonal;
        let verdict = evaluate_transition(&trek, TrekStatus::Published);
        assert!(verdict.blocked_by_readiness());
    }

    #[test]
    fn expedition_cannot_go_seasonal_and_archive_is_ungated() {
        let mut expedition = Expedition::new("", "");
        expedition.status = ExpeditionStatus::Published;
        let verdict = evaluate_transition(&expedition, ExpeditionStatus::Archived);
        assert!(verdict.allowed);
        let verdict = evaluate_transition(&expedition, ExpeditionStatus::Published);
        assert!(!verdict.allowed);
        assert_eq!(verdict.reasons.len(), 1);
    }

    #[test]
    fn verdict_serializes_status_strings() {
        let trek = draft_trek_without_itinerary();
        let verdict = evaluate_transition(&trek, TrekStatus::Archived);
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["from"], "draft");
        assert_eq!(json["to"], "archived");
        assert_eq!(json["kind"], "trek");
    }
}
