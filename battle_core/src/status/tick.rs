//! Status ticks - per-turn dot/hot processing and expiry

use crate::battle::BattleSession;
use crate::event::{BattleEvent, DamageKind, EventBus, HealKind};
use crate::types::StatusKind;
use tracing::trace;

/// Emit one tick event per active status on every living unit
///
/// Returns the number of tick events emitted.
pub fn emit_turn_start_ticks(session: &BattleSession, bus: &mut EventBus) -> usize {
    let mut emitted = 0;
    for unit in session.units().filter(|u| u.is_alive()) {
        for status in &unit.statuses {
            bus.emit(BattleEvent::StatusTicked {
                unit_id: unit.id.clone(),
                status_id: status.id.clone(),
            });
            emitted += 1;
        }
    }
    emitted
}

/// Process one tick of a status
///
/// Dots emit damage of `floor(magnitude * stacks)` from the original caster
/// (or the unit itself), hots emit a heal the same way. The remaining turns
/// then drop by one and the status is removed at zero. Ticking a status the
/// unit no longer has is a no-op.
pub fn handle_status_tick(
    session: &mut BattleSession,
    unit_id: &str,
    status_id: &str,
    bus: &mut EventBus,
) {
    let Some(unit) = session.unit_mut(unit_id) else {
        return;
    };
    let Some(index) = unit.statuses.iter().position(|s| s.id == status_id) else {
        trace!(unit = unit_id, status = status_id, "tick for missing status");
        return;
    };

    let status = &mut unit.statuses[index];
    let amount = status.tick_amount();
    let source_id = status
        .source_id
        .clone()
        .unwrap_or_else(|| unit_id.to_string());

    match status.kind {
        StatusKind::Dot if amount > 0 => {
            bus.emit(BattleEvent::DamageApplied {
                source_id,
                target_id: unit_id.to_string(),
                amount,
                element: status.element,
                kind: DamageKind::Status,
                is_crit: false,
            });
        }
        StatusKind::Hot if amount > 0 => {
            bus.emit(BattleEvent::HealApplied {
                source_id,
                target_id: unit_id.to_string(),
                amount,
                kind: HealKind::Status,
            });
        }
        _ => {}
    }

    status.remaining_turns -= 1;
    if status.is_expired() {
        unit.statuses.remove(index);
        bus.emit(BattleEvent::StatusExpired {
            unit_id: unit_id.to_string(),
            status_id: status_id.to_string(),
        });
    }
}
