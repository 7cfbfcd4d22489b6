//! Status system - dot/hot/buff/debuff/shield instances on units

mod reaction;
mod tick;

pub use reaction::{maybe_emit_reaction, ReactionRule, REACTIONS};
pub use tick::{emit_turn_start_ticks, handle_status_tick};

use crate::types::{Element, StatusKind};
use serde::{Deserialize, Serialize};

/// A status effect active on a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusInstance {
    /// Status ID (e.g., "burn", "poison", "stone_skin"); one instance per id per unit
    pub id: String,
    pub kind: StatusKind,
    /// Unit that applied the status, if any
    #[serde(default)]
    pub source_id: Option<String>,
    pub element: Element,
    pub stacks: u32,
    pub remaining_turns: i32,
    /// Per-stack strength; meaning depends on `kind`
    pub magnitude: f64,
}

impl StatusInstance {
    /// Magnitude of all stacks combined
    pub fn total_magnitude(&self) -> f64 {
        self.magnitude * self.stacks as f64
    }

    /// Amount dealt or healed by one tick of a dot/hot
    pub fn tick_amount(&self) -> u32 {
        self.total_magnitude().floor().max(0.0) as u32
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_turns <= 0
    }

    /// Merge a re-application into this instance
    ///
    /// Stacks add, remaining turns take the max, magnitude is overwritten.
    /// The original source is kept.
    pub fn merge(&mut self, incoming: &StatusInstance) {
        self.stacks = self.stacks.saturating_add(incoming.stacks);
        self.remaining_turns = self.remaining_turns.max(incoming.remaining_turns);
        self.magnitude = incoming.magnitude;
    }
}

/// Find-or-create a status by id on a status list
pub fn apply_status(statuses: &mut Vec<StatusInstance>, incoming: StatusInstance) {
    match statuses.iter_mut().find(|s| s.id == incoming.id) {
        Some(existing) => existing.merge(&incoming),
        None => statuses.push(incoming),
    }
}

/// Sum of `magnitude * stacks` over statuses of one kind
pub fn total_of_kind(statuses: &[StatusInstance], kind: StatusKind) -> f64 {
    statuses
        .iter()
        .filter(|s| s.kind == kind)
        .map(|s| s.total_magnitude())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burn(stacks: u32, turns: i32, magnitude: f64) -> StatusInstance {
        StatusInstance {
            id: "burn".to_string(),
            kind: StatusKind::Dot,
            source_id: Some("player".to_string()),
            element: Element::Fire,
            stacks,
            remaining_turns: turns,
            magnitude,
        }
    }

    #[test]
    fn test_apply_creates_status() {
        let mut statuses = Vec::new();
        apply_status(&mut statuses, burn(1, 3, 5.0));
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].tick_amount(), 5);
    }

    #[test]
    fn test_merge_rule() {
        let mut statuses = vec![burn(2, 4, 5.0)];
        let mut incoming = burn(1, 2, 8.0);
        incoming.source_id = Some("other".to_string());
        apply_status(&mut statuses, incoming);

        assert_eq!(statuses.len(), 1);
        let merged = &statuses[0];
        assert_eq!(merged.stacks, 3);
        assert_eq!(merged.remaining_turns, 4);
        // Magnitude overwritten, not summed
        assert!((merged.magnitude - 8.0).abs() < f64::EPSILON);
        assert_eq!(merged.source_id.as_deref(), Some("player"));
    }

    #[test]
    fn test_total_of_kind() {
        let mut shield = burn(2, 2, 3.0);
        shield.id = "ward".to_string();
        shield.kind = StatusKind::Shield;
        let statuses = vec![burn(1, 1, 4.0), shield];
        assert!((total_of_kind(&statuses, StatusKind::Shield) - 6.0).abs() < f64::EPSILON);
        assert!((total_of_kind(&statuses, StatusKind::Buff) - 0.0).abs() < f64::EPSILON);
    }
}
