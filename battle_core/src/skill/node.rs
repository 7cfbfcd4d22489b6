//! Effect nodes - the building blocks of skills
//!
//! Nodes are a closed set of tagged variants. Each kind implements
//! [`NodeExecutor`]; node types this build does not know deserialize to
//! [`NodeEffect::Unknown`] and do nothing.

use crate::battle::BattleSession;
use crate::context::ResolveContext;
use crate::damage::{resolve_damage, DamageRequest};
use crate::event::{BattleEvent, DamageKind, EventBus, Trigger};
use crate::listener::ListenerScope;
use crate::status::StatusInstance;
use crate::types::{Element, StatusKind};
use serde::{Deserialize, Serialize};
use tracing::trace;

fn default_trigger() -> Trigger {
    Trigger::Cast
}

fn default_scale() -> f64 {
    1.0
}

fn default_stacks() -> u32 {
    1
}

/// One effect node of a skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectNode {
    pub id: String,
    /// Event that fires the node; `cast` for active effects
    #[serde(default = "default_trigger")]
    pub trigger: Trigger,
    #[serde(default)]
    pub scope: ListenerScope,
    pub effect: NodeEffect,
}

/// What a node does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeEffect {
    DealDamage(DealDamageNode),
    ApplyStatus(ApplyStatusNode),
    #[serde(other)]
    Unknown,
}

/// Whom a node affects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeTarget {
    /// Targets picked at cast time; falls back to the event's target
    #[default]
    CastTargets,
    EventTarget,
    EventSource,
    Owner,
}

/// Source stat a derived magnitude reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingStat {
    Attack,
    MaxHp,
}

/// Magnitude = source stat * factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeSource {
    pub stat: ScalingStat,
    pub factor: f64,
}

/// Parameterized damage pipeline invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealDamageNode {
    /// Multiplier on the source's attack
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Flat damage added before defense
    #[serde(default)]
    pub flat: f64,
    /// Overrides the skill element
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub target: NodeTarget,
}

impl Default for DealDamageNode {
    fn default() -> Self {
        DealDamageNode {
            scale: 1.0,
            flat: 0.0,
            element: None,
            target: NodeTarget::default(),
        }
    }
}

/// Emits a status application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyStatusNode {
    pub status_id: String,
    pub kind: StatusKind,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default = "default_stacks")]
    pub stacks: u32,
    pub duration: i32,
    #[serde(default)]
    pub magnitude: f64,
    /// When set, replaces `magnitude`
    #[serde(default)]
    pub magnitude_from: Option<MagnitudeSource>,
    #[serde(default)]
    pub target: NodeTarget,
}

/// What a node sees when it runs
pub struct NodeInvocation<'e> {
    pub owner_id: &'e str,
    pub skill_id: &'e str,
    pub skill_element: Option<Element>,
    /// Event that fired the listener
    pub event: &'e BattleEvent,
    pub cast_targets: &'e [String],
}

impl NodeInvocation<'_> {
    /// Resolve a node target to the ids of living units
    pub fn resolve_targets(&self, target: NodeTarget, session: &BattleSession) -> Vec<String> {
        let ids: Vec<String> = match target {
            NodeTarget::CastTargets if !self.cast_targets.is_empty() => self.cast_targets.to_vec(),
            NodeTarget::CastTargets | NodeTarget::EventTarget => {
                self.event.target_id().map(str::to_string).into_iter().collect()
            }
            NodeTarget::EventSource => {
                self.event.source_id().map(str::to_string).into_iter().collect()
            }
            NodeTarget::Owner => vec![self.owner_id.to_string()],
        };
        ids.into_iter()
            .filter(|id| session.unit(id).map_or(false, |u| u.is_alive()))
            .collect()
    }
}

/// Extension point: one implementation per node kind
pub trait NodeExecutor {
    fn execute(
        &self,
        invocation: &NodeInvocation<'_>,
        session: &BattleSession,
        ctx: &mut ResolveContext<'_>,
        bus: &mut EventBus,
    );
}

impl NodeExecutor for DealDamageNode {
    fn execute(
        &self,
        invocation: &NodeInvocation<'_>,
        session: &BattleSession,
        ctx: &mut ResolveContext<'_>,
        bus: &mut EventBus,
    ) {
        let Some(owner) = session.unit(invocation.owner_id) else {
            return;
        };
        let element = self
            .element
            .or(invocation.skill_element)
            .unwrap_or_else(|| owner.primary_element());

        for target_id in invocation.resolve_targets(self.target, session) {
            let request = DamageRequest::new(invocation.owner_id, &target_id, element, DamageKind::Skill)
                .with_scale(self.scale)
                .with_flat(self.flat);
            resolve_damage(session, &request, ctx, bus);
        }
    }
}

impl NodeExecutor for ApplyStatusNode {
    fn execute(
        &self,
        invocation: &NodeInvocation<'_>,
        session: &BattleSession,
        _ctx: &mut ResolveContext<'_>,
        bus: &mut EventBus,
    ) {
        let Some(owner) = session.unit(invocation.owner_id) else {
            return;
        };
        let magnitude = match self.magnitude_from {
            Some(from) => {
                let stat = match from.stat {
                    ScalingStat::Attack => owner.base.attack,
                    ScalingStat::MaxHp => owner.base.hp as f64,
                };
                stat * from.factor
            }
            None => self.magnitude,
        };
        let element = self
            .element
            .or(invocation.skill_element)
            .unwrap_or(Element::Physical);

        for target_id in invocation.resolve_targets(self.target, session) {
            bus.emit(BattleEvent::StatusApplied {
                target_id,
                status: StatusInstance {
                    id: self.status_id.clone(),
                    kind: self.kind,
                    source_id: Some(invocation.owner_id.to_string()),
                    element,
                    stacks: self.stacks,
                    remaining_turns: self.duration,
                    magnitude,
                },
            });
        }
    }
}

impl NodeEffect {
    pub fn executor(&self) -> Option<&dyn NodeExecutor> {
        match self {
            NodeEffect::DealDamage(node) => Some(node),
            NodeEffect::ApplyStatus(node) => Some(node),
            NodeEffect::Unknown => None,
        }
    }
}

impl EffectNode {
    pub fn execute(
        &self,
        invocation: &NodeInvocation<'_>,
        session: &BattleSession,
        ctx: &mut ResolveContext<'_>,
        bus: &mut EventBus,
    ) {
        match self.effect.executor() {
            Some(executor) => executor.execute(invocation, session, ctx, bus),
            None => trace!(skill = invocation.skill_id, node = %self.id, "unknown node type, skipped"),
        }
    }
}
