//! EffectResolver - the single writer of battle state
//!
//! Every hp change, status change and wave advance happens here, driven by
//! event records. A record is applied at most once per session: records
//! below `session.applied_event_seq` are skipped, so replaying an event list
//! never double-applies it.

use crate::battle::BattleSession;
use crate::context::ResolveContext;
use crate::event::{BattleEvent, EventBus, EventRecord};
use crate::listener::ListenerRegistry;
use crate::locale::{LogLine, Localizer};
use crate::status::{apply_status, handle_status_tick};
use tracing::{debug, trace};

/// Apply one record to the session
///
/// Follow-up events (death on hp reaching zero, dot/hot tick results) are
/// emitted to `bus`. Returns `false` when the record was already applied.
pub fn apply_record(
    session: &mut BattleSession,
    record: &EventRecord,
    localizer: &dyn Localizer,
    bus: &mut EventBus,
) -> bool {
    if record.seq < session.applied_event_seq {
        trace!(seq = record.seq, "already applied");
        return false;
    }
    session.applied_event_seq = record.seq + 1;

    match &record.event {
        BattleEvent::DamageApplied {
            source_id,
            target_id,
            amount,
            ..
        } => {
            if let Some(target) = session.unit_mut(target_id) {
                if target.is_alive() {
                    target.take_damage(*amount);
                    if !target.is_alive() {
                        bus.emit(BattleEvent::UnitDied {
                            unit_id: target_id.clone(),
                            killer_id: Some(source_id.clone()),
                        });
                    }
                }
            }
        }
        BattleEvent::HealApplied {
            target_id, amount, ..
        } => {
            if let Some(target) = session.unit_mut(target_id) {
                if target.is_alive() {
                    target.heal(*amount);
                }
            }
        }
        BattleEvent::UnitDied { unit_id, .. } => {
            if let Some(unit) = session.unit_mut(unit_id) {
                unit.current_hp = 0;
                let line = localizer.format(&LogLine::Defeated { name: &unit.name });
                debug!(unit = %unit_id, "defeated");
                session.logs.push(line);
            }
        }
        BattleEvent::StatusApplied { target_id, status } => {
            if let Some(target) = session.unit_mut(target_id) {
                if target.is_alive() {
                    apply_status(&mut target.statuses, status.clone());
                }
            }
        }
        BattleEvent::StatusTicked { unit_id, status_id } => {
            handle_status_tick(session, unit_id, status_id, bus);
        }
        BattleEvent::ElementReaction {
            reaction,
            target_id,
            bonus,
            ..
        } => {
            if let Some(target) = session.unit(target_id) {
                let line = localizer.format(&LogLine::Reaction {
                    reaction,
                    target: &target.name,
                    bonus: *bonus,
                });
                session.logs.push(line);
            }
        }
        BattleEvent::WaveAdvanced { wave_index, .. } => {
            if *wave_index > session.current_wave_index {
                session.current_wave_index = *wave_index;
                let line = localizer.format(&LogLine::WaveAdvanced {
                    wave: wave_index + 1,
                    total: session.wave_order.len(),
                });
                session.logs.push(line);
            }
        }
        BattleEvent::TurnStart { .. }
        | BattleEvent::TurnEnd { .. }
        | BattleEvent::BeforeAction { .. }
        | BattleEvent::AfterAction { .. }
        | BattleEvent::Cast { .. }
        | BattleEvent::StatusExpired { .. } => {}
    }

    session.events.push(record.clone());
    true
}

/// Drain the bus until it is empty, applying and dispatching every record
///
/// Events emitted while handling a round form the next round. Rounds past
/// `max_listener_depth` are still applied but no longer dispatched.
pub fn resolve_effects(
    session: &mut BattleSession,
    registry: &mut ListenerRegistry,
    ctx: &mut ResolveContext<'_>,
    bus: &mut EventBus,
) {
    let max_depth = ctx.constants.turn.max_listener_depth;
    let mut depth = 0;

    loop {
        let batch = bus.drain();
        if batch.is_empty() {
            break;
        }
        let dispatch = depth < max_depth;
        if !dispatch {
            trace!(depth, events = batch.len(), "listener depth reached, applying only");
        }

        for record in &batch {
            if !apply_record(session, record, ctx.localizer, bus) {
                continue;
            }
            if dispatch {
                registry.dispatch(&record.event, session, ctx, bus);
            }
        }
        depth += 1;
    }
}

/// Re-apply recorded events without dispatching listeners
///
/// Follow-up events are discarded since the recorded list already contains
/// them. Returns the number of records applied.
pub fn replay_records(
    session: &mut BattleSession,
    records: &[EventRecord],
    localizer: &dyn Localizer,
) -> usize {
    let mut scratch = EventBus::new();
    records
        .iter()
        .filter(|record| apply_record(session, record, localizer, &mut scratch))
        .count()
}
