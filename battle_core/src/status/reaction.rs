//! Element reactions - combo bonuses between an attacker element and a target dot

use crate::event::{BattleEvent, DamageKind, EventBus};
use crate::types::Element;
use crate::unit::CombatUnit;

/// Attacker element vs. active target dot element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionRule {
    pub name: &'static str,
    pub attacker: Element,
    pub target_dot: Element,
}

/// Reaction table; the first matching row wins
pub const REACTIONS: &[ReactionRule] = &[ReactionRule {
    name: "combustion",
    attacker: Element::Fire,
    target_dot: Element::Poison,
}];

/// Emit a reaction if the hit completes a combo
///
/// The attacker qualifies through the hit element or its own elements.
/// Bonus damage is `floor(target max hp * fraction)`. Returns the bonus.
pub fn maybe_emit_reaction(
    source: &CombatUnit,
    target: &CombatUnit,
    hit_element: Element,
    fraction: f64,
    bus: &mut EventBus,
) -> Option<u32> {
    let rule = REACTIONS.iter().find(|rule| {
        (hit_element == rule.attacker || source.has_element(rule.attacker))
            && target.has_dot_of(rule.target_dot)
    })?;

    let bonus = ((target.base.hp as f64) * fraction).floor() as u32;
    if bonus == 0 {
        return None;
    }

    bus.emit(BattleEvent::DamageApplied {
        source_id: source.id.clone(),
        target_id: target.id.clone(),
        amount: bonus,
        element: rule.attacker,
        kind: DamageKind::Reaction,
        is_crit: false,
    });
    bus.emit(BattleEvent::ElementReaction {
        source_id: source.id.clone(),
        target_id: target.id.clone(),
        reaction: rule.name.to_string(),
        bonus,
    });
    Some(bonus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusInstance;
    use crate::types::{Faction, StatusKind};
    use crate::unit::{BaseStats, DerivedStats, UnitMetadata};

    fn unit(id: &str, hp: u32, elements: Vec<Element>) -> CombatUnit {
        CombatUnit {
            id: id.to_string(),
            name: id.to_string(),
            faction: Faction::Monster,
            level: 1,
            base: BaseStats {
                hp,
                attack: 10.0,
                defense: 0.0,
            },
            current_hp: hp,
            derived: DerivedStats::default(),
            skills: Vec::new(),
            passives: Vec::new(),
            elements,
            statuses: Vec::new(),
            listeners: Vec::new(),
            metadata: UnitMetadata::default(),
        }
    }

    fn poisoned(mut target: CombatUnit) -> CombatUnit {
        target.statuses.push(StatusInstance {
            id: "poison".to_string(),
            kind: StatusKind::Dot,
            source_id: None,
            element: Element::Poison,
            stacks: 1,
            remaining_turns: 2,
            magnitude: 3.0,
        });
        target
    }

    #[test]
    fn test_fire_vs_poison_combustion() {
        let source = unit("mage", 50, vec![Element::Fire]);
        let target = poisoned(unit("slime", 200, Vec::new()));
        let mut bus = EventBus::new();

        let bonus = maybe_emit_reaction(&source, &target, Element::Physical, 0.05, &mut bus);
        assert_eq!(bonus, Some(10));

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0].event,
            BattleEvent::DamageApplied { amount: 10, kind: DamageKind::Reaction, .. }
        ));
        assert!(matches!(events[1].event, BattleEvent::ElementReaction { bonus: 10, .. }));
    }

    #[test]
    fn test_no_reaction_without_dot() {
        let source = unit("mage", 50, vec![Element::Fire]);
        let target = unit("slime", 200, Vec::new());
        let mut bus = EventBus::new();
        assert_eq!(maybe_emit_reaction(&source, &target, Element::Fire, 0.05, &mut bus), None);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_no_reaction_for_other_elements() {
        let source = unit("frost", 50, vec![Element::Ice]);
        let target = poisoned(unit("slime", 200, Vec::new()));
        let mut bus = EventBus::new();
        assert_eq!(maybe_emit_reaction(&source, &target, Element::Ice, 0.05, &mut bus), None);
    }
}
