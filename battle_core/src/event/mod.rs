//! Battle events - the single channel of state mutation
//!
//! Every change to hp, statuses or wave position is expressed as a
//! [`BattleEvent`]. Events are wrapped in an [`EventRecord`] carrying a
//! session-wide sequence number so they can be replayed idempotently.

mod bus;

pub use bus::EventBus;

use crate::status::StatusInstance;
use crate::types::Element;
use serde::{Deserialize, Serialize};

/// Why damage was dealt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    Attack,
    Skill,
    Status,
    Reaction,
    Reflect,
}

/// Why hp was restored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealKind {
    Lifesteal,
    Status,
    Skill,
}

/// A battle event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEvent {
    TurnStart {
        turn: u32,
    },
    TurnEnd {
        turn: u32,
    },
    BeforeAction {
        source_id: String,
        #[serde(default)]
        skill_id: Option<String>,
    },
    AfterAction {
        source_id: String,
        #[serde(default)]
        skill_id: Option<String>,
    },
    Cast {
        source_id: String,
        skill_id: String,
        target_ids: Vec<String>,
    },
    DamageApplied {
        source_id: String,
        target_id: String,
        amount: u32,
        element: Element,
        kind: DamageKind,
        #[serde(default)]
        is_crit: bool,
    },
    HealApplied {
        source_id: String,
        target_id: String,
        amount: u32,
        kind: HealKind,
    },
    UnitDied {
        unit_id: String,
        #[serde(default)]
        killer_id: Option<String>,
    },
    StatusApplied {
        target_id: String,
        status: StatusInstance,
    },
    StatusTicked {
        unit_id: String,
        status_id: String,
    },
    StatusExpired {
        unit_id: String,
        status_id: String,
    },
    ElementReaction {
        source_id: String,
        target_id: String,
        reaction: String,
        bonus: u32,
    },
    WaveAdvanced {
        wave_index: usize,
        wave_id: String,
    },
}

/// Event type tag, used to bucket listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    TurnStart,
    TurnEnd,
    BeforeAction,
    AfterAction,
    Cast,
    DamageApplied,
    HealApplied,
    UnitDied,
    StatusApplied,
    StatusTicked,
    StatusExpired,
    ElementReaction,
    WaveAdvanced,
}

impl BattleEvent {
    pub fn trigger(&self) -> Trigger {
        match self {
            BattleEvent::TurnStart { .. } => Trigger::TurnStart,
            BattleEvent::TurnEnd { .. } => Trigger::TurnEnd,
            BattleEvent::BeforeAction { .. } => Trigger::BeforeAction,
            BattleEvent::AfterAction { .. } => Trigger::AfterAction,
            BattleEvent::Cast { .. } => Trigger::Cast,
            BattleEvent::DamageApplied { .. } => Trigger::DamageApplied,
            BattleEvent::HealApplied { .. } => Trigger::HealApplied,
            BattleEvent::UnitDied { .. } => Trigger::UnitDied,
            BattleEvent::StatusApplied { .. } => Trigger::StatusApplied,
            BattleEvent::StatusTicked { .. } => Trigger::StatusTicked,
            BattleEvent::StatusExpired { .. } => Trigger::StatusExpired,
            BattleEvent::ElementReaction { .. } => Trigger::ElementReaction,
            BattleEvent::WaveAdvanced { .. } => Trigger::WaveAdvanced,
        }
    }

    /// Unit that caused the event, if any
    pub fn source_id(&self) -> Option<&str> {
        match self {
            BattleEvent::BeforeAction { source_id, .. }
            | BattleEvent::AfterAction { source_id, .. }
            | BattleEvent::Cast { source_id, .. }
            | BattleEvent::DamageApplied { source_id, .. }
            | BattleEvent::HealApplied { source_id, .. }
            | BattleEvent::ElementReaction { source_id, .. } => Some(source_id),
            BattleEvent::UnitDied { killer_id, .. } => killer_id.as_deref(),
            BattleEvent::StatusApplied { status, .. } => status.source_id.as_deref(),
            _ => None,
        }
    }

    /// Unit the event happened to, if any
    pub fn target_id(&self) -> Option<&str> {
        match self {
            BattleEvent::DamageApplied { target_id, .. }
            | BattleEvent::HealApplied { target_id, .. }
            | BattleEvent::StatusApplied { target_id, .. }
            | BattleEvent::ElementReaction { target_id, .. } => Some(target_id),
            BattleEvent::UnitDied { unit_id, .. }
            | BattleEvent::StatusTicked { unit_id, .. }
            | BattleEvent::StatusExpired { unit_id, .. } => Some(unit_id),
            _ => None,
        }
    }
}

/// An event stamped with its position in the session's event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: u64,
    pub turn: u32,
    pub event: BattleEvent,
}
