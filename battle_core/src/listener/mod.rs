//! Listeners - reactions bound to a unit, fired by matching events

mod registry;

pub use registry::ListenerRegistry;

use crate::battle::BattleSession;
use crate::context::ResolveContext;
use crate::event::{BattleEvent, EventBus, Trigger};
use crate::skill::{EffectNode, NodeInvocation};
use crate::types::Element;
use serde::{Deserialize, Serialize};

/// Which events a listener reacts to, relative to its owner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerScope {
    /// Events caused by the owner
    #[default]
    Source,
    /// Events happening to the owner
    Target,
    /// Every event of the trigger type
    Any,
}

/// A registered reaction
///
/// Transient (`once`) listeners back skill casts and are removed after firing.
/// Persistent listeners back passives and live for the whole session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listener {
    pub id: String,
    pub owner_id: String,
    pub trigger: Trigger,
    #[serde(default)]
    pub scope: ListenerScope,
    pub once: bool,
    /// Skill the node belongs to
    pub skill_id: String,
    #[serde(default)]
    pub element: Option<Element>,
    pub node: EffectNode,
    /// Targets chosen when the skill was cast
    #[serde(default)]
    pub targets: Vec<String>,
}

impl Listener {
    /// Whether this listener reacts to `event`
    pub fn matches(&self, event: &BattleEvent) -> bool {
        if event.trigger() != self.trigger {
            return false;
        }
        // A cast listener only answers its own skill
        if let BattleEvent::Cast { skill_id, .. } = event {
            if self.once && *skill_id != self.skill_id {
                return false;
            }
        }
        match self.scope {
            ListenerScope::Source => event.source_id() == Some(self.owner_id.as_str()),
            ListenerScope::Target => event.target_id() == Some(self.owner_id.as_str()),
            ListenerScope::Any => true,
        }
    }

    /// Run the listener's node with its owner as the source
    pub fn fire(
        &self,
        event: &BattleEvent,
        session: &BattleSession,
        ctx: &mut ResolveContext<'_>,
        bus: &mut EventBus,
    ) {
        let invocation = NodeInvocation {
            owner_id: &self.owner_id,
            skill_id: &self.skill_id,
            skill_element: self.element,
            event,
            cast_targets: &self.targets,
        };
        self.node.execute(&invocation, session, ctx, bus);
    }
}
