//! TurnManager - one full turn of a battle
//!
//! Turn order is fixed: status ticks, the player's action, then every living
//! enemy of the current wave in array order.

use super::{BattleSession, PlayerCommand};
use crate::action::{opponents_of, resolve_action, select_targets, Action};
use crate::context::ResolveContext;
use crate::effect::resolve_effects;
use crate::event::{BattleEvent, EventBus};
use crate::listener::ListenerRegistry;
use crate::locale::LogLine;
use crate::status::emit_turn_start_ticks;
use crate::types::{BattlePhase, BattleStatus};
use tracing::debug;

/// Resolve one turn
///
/// The caller's session is never mutated; the next state is returned. A
/// session that is no longer fighting is returned unchanged.
pub fn resolve_turn(
    session: &BattleSession,
    ctx: &mut ResolveContext<'_>,
    bus: &mut EventBus,
) -> BattleSession {
    if session.status.is_terminal() {
        return session.clone();
    }

    let mut next = session.clone();
    next.turn += 1;
    next.phase = BattlePhase::Resolving;
    let turn = next.turn;
    bus.set_turn(turn);
    debug!(session = %next.id, turn, wave = next.current_wave_index, "turn start");

    let mut registry = ListenerRegistry::from_session(&mut next, ctx.content);
    run_phases(&mut next, &mut registry, ctx, bus);

    bus.emit(BattleEvent::TurnEnd { turn });
    resolve_effects(&mut next, &mut registry, ctx, bus);
    registry.restore_into(&mut next);
    next.next_event_seq = bus.next_seq();

    debug!(
        session = %next.id,
        turn,
        status = ?next.status,
        player_hp = next.player.current_hp,
        "turn end"
    );
    next
}

fn run_phases(
    session: &mut BattleSession,
    registry: &mut ListenerRegistry,
    ctx: &mut ResolveContext<'_>,
    bus: &mut EventBus,
) {
    // 1. Turn start and status ticks
    bus.emit(BattleEvent::TurnStart { turn: session.turn });
    emit_turn_start_ticks(session, bus);
    resolve_effects(session, registry, ctx, bus);
    if settle(session, ctx) {
        return;
    }

    // 2-3. Skip cleared waves
    advance_waves(session, registry, ctx, bus);
    if settle(session, ctx) {
        return;
    }

    // 4. Player action
    let command = session.queued_command.take();
    let action = player_action(session, command, ctx);
    let logs = resolve_action(&action, session, registry, ctx, bus);
    session.logs.extend(logs);
    resolve_effects(session, registry, ctx, bus);
    if settle(session, ctx) {
        return;
    }

    // 5. The player's hit may have cleared a wave
    advance_waves(session, registry, ctx, bus);
    if settle(session, ctx) {
        return;
    }

    // 6. Enemy phase
    session.phase = BattlePhase::EnemyTurn;
    let enemy_ids: Vec<String> = session
        .living_in_current_wave()
        .into_iter()
        .map(|e| e.id.clone())
        .collect();
    for enemy_id in enemy_ids {
        let action = enemy_action(session, &enemy_id, ctx);
        let logs = resolve_action(&action, session, registry, ctx, bus);
        session.logs.extend(logs);
    }

    // 7. Enemy effects as one batch; the pipeline already saw earlier
    // enemies' hits through the pending queue
    resolve_effects(session, registry, ctx, bus);
    advance_waves(session, registry, ctx, bus);
    if settle(session, ctx) {
        return;
    }
    session.phase = BattlePhase::PlayerInput;
}

/// Move the wave index past fully cleared waves
///
/// The index never decreases and stays put once no living wave remains.
pub fn advance_waves(
    session: &mut BattleSession,
    registry: &mut ListenerRegistry,
    ctx: &mut ResolveContext<'_>,
    bus: &mut EventBus,
) {
    let Some(next) = session.next_live_wave() else {
        return;
    };
    if next <= session.current_wave_index {
        return;
    }
    let wave_id = session.wave_order[next].clone();
    debug!(session = %session.id, from = session.current_wave_index, to = next, "wave advance");
    bus.emit(BattleEvent::WaveAdvanced {
        wave_index: next,
        wave_id,
    });
    resolve_effects(session, registry, ctx, bus);
}

/// Check for victory/defeat; logs and returns `true` once terminal
fn settle(session: &mut BattleSession, ctx: &ResolveContext<'_>) -> bool {
    let was_terminal = session.status.is_terminal();
    let status = session.check_outcome();
    if !status.is_terminal() {
        return false;
    }
    if !was_terminal {
        let line = match status {
            BattleStatus::Victory => LogLine::Victory,
            _ => LogLine::Defeat,
        };
        session.logs.push(ctx.localizer.format(&line));
        debug!(session = %session.id, turn = session.turn, ?status, "battle over");
    }
    true
}

fn player_action(
    session: &BattleSession,
    command: Option<PlayerCommand>,
    ctx: &ResolveContext<'_>,
) -> Action {
    let player = &session.player;

    if let Some(PlayerCommand::CastSkill { skill_id, target_id }) = &command {
        let known = player.skills.iter().any(|s| s == skill_id);
        if let Some(skill) = ctx.content.skill(skill_id).filter(|_| known) {
            return Action::CastSkill {
                source_id: player.id.clone(),
                skill_id: skill_id.clone(),
                target_ids: select_targets(session, &player.id, skill.target, target_id.as_deref()),
            };
        }
        debug!(skill = %skill_id, "player cannot cast, falling back to attack");
    }

    let preferred = match &command {
        Some(PlayerCommand::Attack { target_id }) => target_id.as_deref(),
        _ => None,
    };
    let opponents = opponents_of(session, &player.id);
    let target = preferred
        .and_then(|id| opponents.iter().find(|o| o.as_str() == id))
        .or_else(|| opponents.first())
        .cloned();

    Action::BasicAttack {
        source_id: player.id.clone(),
        target_ids: target.into_iter().collect(),
    }
}

/// Enemies with skills cast their first skill every `enemy_skill_cadence` turns
fn enemy_action(session: &BattleSession, enemy_id: &str, ctx: &ResolveContext<'_>) -> Action {
    let cadence = ctx.constants.turn.enemy_skill_cadence;
    let skill = session
        .unit(enemy_id)
        .and_then(|enemy| enemy.skills.first())
        .filter(|_| cadence > 0 && session.turn % cadence == 0)
        .and_then(|skill_id| ctx.content.skill(skill_id));

    match skill {
        Some(skill) => Action::CastSkill {
            source_id: enemy_id.to_string(),
            skill_id: skill.id.clone(),
            target_ids: select_targets(session, enemy_id, skill.target, None),
        },
        None => Action::BasicAttack {
            source_id: enemy_id.to_string(),
            target_ids: opponents_of(session, enemy_id),
        },
    }
}
