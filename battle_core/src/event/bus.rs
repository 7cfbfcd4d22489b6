//! EventBus - append-only per-turn event log

use super::{BattleEvent, EventRecord};
use tracing::trace;

/// Collects events emitted during one turn
///
/// Sequence numbers continue from the session's counter so records stay
/// unique across turns.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    turn: u32,
    next_seq: u64,
    pending: Vec<EventRecord>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus::default()
    }

    /// Bus continuing a session's sequence numbering
    pub fn starting_at(next_seq: u64, turn: u32) -> Self {
        EventBus {
            turn,
            next_seq,
            pending: Vec::new(),
        }
    }

    pub fn set_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    /// Append an event, returning its sequence number
    pub fn emit(&mut self, event: BattleEvent) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        trace!(seq, turn = self.turn, ?event, "emit");
        self.pending.push(EventRecord {
            seq,
            turn: self.turn,
            event,
        });
        seq
    }

    /// Copy of pending records
    pub fn events(&self) -> Vec<EventRecord> {
        self.pending.clone()
    }

    /// Take all pending records, leaving the bus empty
    pub fn drain(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.pending)
    }

    /// Position marker for [`EventBus::since`]
    pub fn mark(&self) -> usize {
        self.pending.len()
    }

    /// Pending records emitted after `mark`
    pub fn since(&self, mark: usize) -> &[EventRecord] {
        self.pending.get(mark..).unwrap_or(&[])
    }

    /// Sequence number the next emitted event will receive
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Hp of a unit once the pending records are applied
    ///
    /// Folds queued hits and heals onto `current_hp` the way the effect
    /// resolver will, so emitters see hits queued earlier in the same round.
    pub fn projected_hp(&self, unit_id: &str, current_hp: u32, max_hp: u32) -> u32 {
        self.pending.iter().fold(current_hp, |hp, record| match &record.event {
            BattleEvent::DamageApplied { target_id, amount, .. } if target_id == unit_id => {
                hp.saturating_sub(*amount)
            }
            BattleEvent::HealApplied { target_id, amount, .. } if target_id == unit_id && hp > 0 => {
                hp.saturating_add(*amount).min(max_hp)
            }
            BattleEvent::UnitDied { unit_id: dead, .. } if dead == unit_id => 0,
            _ => hp,
        })
    }
}
