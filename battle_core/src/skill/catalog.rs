//! Skill catalog - skill definitions and listener construction

use super::node::EffectNode;
use crate::event::{BattleEvent, EventBus, Trigger};
use crate::listener::{Listener, ListenerRegistry};
use crate::types::Element;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default target selection when a skill is cast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTargeting {
    #[default]
    SingleEnemy,
    AllEnemies,
    #[serde(rename = "self")]
    Caster,
}

/// A skill: an ordered list of effect nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub target: SkillTargeting,
    #[serde(default)]
    pub nodes: Vec<EffectNode>,
}

/// Cast a skill
///
/// Builds one `once` listener per node, hands them to the registry and emits
/// the cast event. Cast-triggered nodes fire when that event is dispatched;
/// nodes with other triggers wait for their event, even across turns.
/// Returns the number of listeners registered.
pub fn cast_skill(
    skill: &SkillDefinition,
    source_id: &str,
    target_ids: &[String],
    registry: &mut ListenerRegistry,
    bus: &mut EventBus,
) -> usize {
    let cast_seq = bus.next_seq();
    let mut registered = 0;

    for node in &skill.nodes {
        let listener = Listener {
            id: format!("{}:{}:{}:{}", source_id, skill.id, node.id, cast_seq),
            owner_id: source_id.to_string(),
            trigger: node.trigger,
            scope: node.scope,
            once: true,
            skill_id: skill.id.clone(),
            element: skill.element,
            node: node.clone(),
            targets: target_ids.to_vec(),
        };
        if registry.register(listener) {
            registered += 1;
        }
    }

    debug!(source = source_id, skill = %skill.id, targets = target_ids.len(), "cast");
    bus.emit(BattleEvent::Cast {
        source_id: source_id.to_string(),
        skill_id: skill.id.clone(),
        target_ids: target_ids.to_vec(),
    });
    registered
}

/// Permanent listeners for the non-cast nodes of a passive skill
///
/// Ids are stable per owner/skill/node, so registering twice is a no-op.
pub fn passive_listeners(owner_id: &str, skill: &SkillDefinition) -> Vec<Listener> {
    skill
        .nodes
        .iter()
        .filter(|node| node.trigger != Trigger::Cast)
        .map(|node| Listener {
            id: format!("{}:{}:{}", owner_id, skill.id, node.id),
            owner_id: owner_id.to_string(),
            trigger: node.trigger,
            scope: node.scope,
            once: false,
            skill_id: skill.id.clone(),
            element: skill.element,
            node: node.clone(),
            targets: Vec::new(),
        })
        .collect()
}
