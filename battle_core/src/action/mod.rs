//! ActionResolver - one basic attack or skill cast

use crate::battle::BattleSession;
use crate::context::ResolveContext;
use crate::damage::{resolve_damage, DamageRequest};
use crate::event::{BattleEvent, DamageKind, EventBus};
use crate::listener::ListenerRegistry;
use crate::locale::LogLine;
use crate::skill::{cast_skill, SkillTargeting};
use crate::types::Faction;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// An action taken by one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    BasicAttack {
        source_id: String,
        target_ids: Vec<String>,
    },
    CastSkill {
        source_id: String,
        skill_id: String,
        target_ids: Vec<String>,
    },
}

impl Action {
    pub fn source_id(&self) -> &str {
        match self {
            Action::BasicAttack { source_id, .. } | Action::CastSkill { source_id, .. } => source_id,
        }
    }
}

/// Resolve one action, emitting its events to `bus`
///
/// No-op when the source is missing or dead. Returns log lines describing
/// the action; hp changes happen later when the effects are resolved.
pub fn resolve_action(
    action: &Action,
    session: &BattleSession,
    registry: &mut ListenerRegistry,
    ctx: &mut ResolveContext<'_>,
    bus: &mut EventBus,
) -> Vec<String> {
    let Some(source) = session.unit(action.source_id()).filter(|u| u.is_alive()) else {
        trace!(source = action.source_id(), "action source missing or dead");
        return Vec::new();
    };
    let mut logs = Vec::new();

    match action {
        Action::BasicAttack { target_ids, .. } => {
            bus.emit(BattleEvent::BeforeAction {
                source_id: source.id.clone(),
                skill_id: None,
            });

            for target_id in target_ids {
                let Some(target) = session.unit(target_id).filter(|u| u.is_alive()) else {
                    continue;
                };
                let mark = bus.mark();
                let request = DamageRequest::new(&source.id, target_id, source.primary_element(), DamageKind::Attack);
                resolve_damage(session, &request, ctx, bus);

                // Describe the hit from what the pipeline emitted
                for record in bus.since(mark) {
                    if let BattleEvent::DamageApplied {
                        source_id: s,
                        target_id: t,
                        amount,
                        is_crit,
                        kind: DamageKind::Attack,
                        ..
                    } = &record.event
                    {
                        if s == &source.id && t == target_id {
                            logs.push(ctx.localizer.format(&LogLine::Attack {
                                source: &source.name,
                                target: &target.name,
                                amount: *amount,
                                crit: *is_crit,
                            }));
                        }
                    }
                }
            }

            bus.emit(BattleEvent::AfterAction {
                source_id: source.id.clone(),
                skill_id: None,
            });
        }
        Action::CastSkill {
            skill_id, target_ids, ..
        } => {
            let Some(skill) = ctx.content.skill(skill_id) else {
                warn!(source = %source.id, skill = %skill_id, "unknown skill, action skipped");
                return logs;
            };
            let live_targets: Vec<String> = target_ids
                .iter()
                .filter(|id| session.unit(id).map_or(false, |u| u.is_alive()))
                .cloned()
                .collect();

            bus.emit(BattleEvent::BeforeAction {
                source_id: source.id.clone(),
                skill_id: Some(skill_id.clone()),
            });
            cast_skill(skill, &source.id, &live_targets, registry, bus);
            logs.push(ctx.localizer.format(&LogLine::Cast {
                source: &source.name,
                skill: &skill.name,
            }));
            bus.emit(BattleEvent::AfterAction {
                source_id: source.id.clone(),
                skill_id: Some(skill_id.clone()),
            });
        }
    }

    logs
}

/// Living opponents of `source_id` in the current wave, in array order
pub fn opponents_of(session: &BattleSession, source_id: &str) -> Vec<String> {
    let Some(source) = session.unit(source_id) else {
        return Vec::new();
    };
    match source.faction {
        Faction::Player => session
            .living_in_current_wave()
            .into_iter()
            .map(|u| u.id.clone())
            .collect(),
        Faction::Monster => {
            if session.player.is_alive() {
                vec![session.player.id.clone()]
            } else {
                Vec::new()
            }
        }
    }
}

/// Pick skill targets
///
/// `preferred` wins for single-target skills when it is a living opponent.
pub fn select_targets(
    session: &BattleSession,
    source_id: &str,
    targeting: SkillTargeting,
    preferred: Option<&str>,
) -> Vec<String> {
    let opponents = opponents_of(session, source_id);
    match targeting {
        SkillTargeting::Caster => vec![source_id.to_string()],
        SkillTargeting::AllEnemies => opponents,
        SkillTargeting::SingleEnemy => {
            let chosen = preferred
                .and_then(|id| opponents.iter().find(|o| o.as_str() == id))
                .or_else(|| opponents.first());
            chosen.cloned().into_iter().collect()
        }
    }
}
