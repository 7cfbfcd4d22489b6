//! ListenerRegistry - trigger-indexed listener storage for one turn
//!
//! The registry is rebuilt from session state at the start of every turn.
//! While it exists it is the only owner of transient listeners; unfired ones
//! are handed back to their units when the turn ends.

use super::Listener;
use crate::battle::BattleSession;
use crate::content::ContentCatalog;
use crate::context::ResolveContext;
use crate::event::{BattleEvent, EventBus, Trigger};
use crate::skill::passive_listeners;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{trace, warn};

#[derive(Debug, Default)]
pub struct ListenerRegistry {
    /// Listeners keyed by registration sequence
    listeners: BTreeMap<u64, Listener>,
    seq_by_id: HashMap<String, u64>,
    by_trigger: HashMap<Trigger, BTreeSet<u64>>,
    by_owner: HashMap<String, BTreeSet<u64>>,
    next_seq: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        ListenerRegistry::default()
    }

    /// Take every unit-held listener and register passives for living units
    pub fn from_session(session: &mut BattleSession, content: &dyn ContentCatalog) -> Self {
        let mut registry = ListenerRegistry::new();

        for unit in session.units_mut() {
            for listener in std::mem::take(&mut unit.listeners) {
                registry.register(listener);
            }

            if !unit.is_alive() {
                continue;
            }
            for passive_id in &unit.passives {
                match content.skill(passive_id) {
                    Some(skill) => {
                        for listener in passive_listeners(&unit.id, skill) {
                            registry.register(listener);
                        }
                    }
                    None => warn!(unit = %unit.id, passive = %passive_id, "unknown passive skill"),
                }
            }
        }

        registry
    }

    /// Return unfired transient listeners to their owners
    ///
    /// Persistent listeners are dropped; they are derived again next turn.
    pub fn restore_into(mut self, session: &mut BattleSession) {
        for unit in session.units_mut() {
            let Some(seqs) = self.by_owner.remove(&unit.id) else {
                continue;
            };
            for seq in seqs {
                if let Some(listener) = self.listeners.remove(&seq) {
                    if listener.once {
                        unit.listeners.push(listener);
                    }
                }
            }
        }
    }

    /// Register a listener; a duplicate id is a no-op
    pub fn register(&mut self, listener: Listener) -> bool {
        if self.seq_by_id.contains_key(&listener.id) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;

        self.by_trigger.entry(listener.trigger).or_default().insert(seq);
        self.by_owner
            .entry(listener.owner_id.clone())
            .or_default()
            .insert(seq);
        self.seq_by_id.insert(listener.id.clone(), seq);
        self.listeners.insert(seq, listener);
        true
    }

    /// Remove a listener from every index
    pub fn unregister(&mut self, id: &str) -> Option<Listener> {
        let seq = self.seq_by_id.remove(id)?;
        let listener = self.listeners.remove(&seq)?;
        if let Some(seqs) = self.by_trigger.get_mut(&listener.trigger) {
            seqs.remove(&seq);
        }
        if let Some(seqs) = self.by_owner.get_mut(&listener.owner_id) {
            seqs.remove(&seq);
        }
        Some(listener)
    }

    pub fn get(&self, id: &str) -> Option<&Listener> {
        self.seq_by_id.get(id).and_then(|seq| self.listeners.get(seq))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seq_by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Listeners owned by a unit, in registration order
    pub fn owned_by(&self, owner_id: &str) -> Vec<&Listener> {
        self.by_owner
            .get(owner_id)
            .map(|seqs| seqs.iter().filter_map(|seq| self.listeners.get(seq)).collect())
            .unwrap_or_default()
    }

    /// Next listener for `trigger` registered at or after `from` and before `end`
    fn next_for(&self, trigger: Trigger, from: u64, end: u64) -> Option<u64> {
        self.by_trigger
            .get(&trigger)
            .and_then(|seqs| seqs.range(from..end).next().copied())
    }

    /// Fire every listener matching `event`, in registration order
    ///
    /// Listeners whose owner is missing or dead are skipped. Fired `once`
    /// listeners are removed. Listeners registered while dispatching wait
    /// for the next event. Returns the number of listeners fired.
    pub fn dispatch(
        &mut self,
        event: &BattleEvent,
        session: &BattleSession,
        ctx: &mut ResolveContext<'_>,
        bus: &mut EventBus,
    ) -> usize {
        let trigger = event.trigger();
        let end = self.next_seq;
        let mut cursor = 0;
        let mut fired = 0;

        while let Some(seq) = self.next_for(trigger, cursor, end) {
            cursor = seq + 1;
            let Some(listener) = self.listeners.get(&seq) else {
                continue;
            };
            if !listener.matches(event) {
                continue;
            }
            let owner_alive = session
                .unit(&listener.owner_id)
                .map_or(false, |owner| owner.is_alive());
            if !owner_alive {
                trace!(listener = %listener.id, "owner missing or dead, skipped");
                continue;
            }

            trace!(listener = %listener.id, ?trigger, "fire");
            listener.fire(event, session, ctx, bus);
            fired += 1;

            if listener.once {
                let id = listener.id.clone();
                self.unregister(&id);
            }
        }

        fired
    }
}
