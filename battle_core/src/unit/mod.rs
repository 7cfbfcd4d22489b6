//! Combat units - runtime state of one participant in a battle

mod factory;

pub use factory::{UnitFactory, UnitSchema};

use crate::listener::Listener;
use crate::status::StatusInstance;
use crate::types::{Element, EnemyRank, Faction, StatusKind};
use serde::{Deserialize, Serialize};

/// Stats that bound a unit's hp and drive its damage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    /// Maximum hp
    pub hp: u32,
    pub attack: f64,
    pub defense: f64,
}

/// Percent stats derived by the finalizer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub damage_reduction: f64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub lifesteal_rate: f64,
    pub thorns_rate: f64,
    pub elemental_bonus: f64,
    pub penetration: f64,
}

/// Bookkeeping carried by a unit for session assembly and rewards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitMetadata {
    #[serde(default)]
    pub wave_id: Option<String>,
    #[serde(default)]
    pub monster_id: Option<String>,
    #[serde(default)]
    pub rank: EnemyRank,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub gold: u32,
}

/// A runtime combat unit
///
/// `current_hp` stays within `[0, base.hp]`; a unit at 0 hp takes no further actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatUnit {
    pub id: String,
    pub name: String,
    pub faction: Faction,
    pub level: u32,
    pub base: BaseStats,
    pub current_hp: u32,
    pub derived: DerivedStats,

    // === Abilities ===
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub passives: Vec<String>,
    #[serde(default)]
    pub elements: Vec<Element>,

    // === Owned state ===
    #[serde(default)]
    pub statuses: Vec<StatusInstance>,
    /// Transient listeners that have not fired yet
    #[serde(default)]
    pub listeners: Vec<Listener>,
    #[serde(default)]
    pub metadata: UnitMetadata,
}

impl CombatUnit {
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn missing_hp(&self) -> u32 {
        self.base.hp.saturating_sub(self.current_hp)
    }

    /// Current hp as a percentage of max hp
    pub fn hp_percent(&self) -> f64 {
        if self.base.hp == 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.base.hp as f64 * 100.0
    }

    /// Element used by basic attacks
    pub fn primary_element(&self) -> Element {
        self.elements.first().copied().unwrap_or(Element::Physical)
    }

    pub fn has_element(&self, element: Element) -> bool {
        self.elements.contains(&element)
    }

    pub fn status(&self, id: &str) -> Option<&StatusInstance> {
        self.statuses.iter().find(|s| s.id == id)
    }

    /// Whether any dot of the given element is active
    pub fn has_dot_of(&self, element: Element) -> bool {
        self.statuses
            .iter()
            .any(|s| s.kind == StatusKind::Dot && s.element == element)
    }

    /// Lower hp, saturating at 0
    pub fn take_damage(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }

    /// Raise hp, capped at max hp
    pub fn heal(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_add(amount).min(self.base.hp);
    }

    /// Multiply offense (used by boss counter goals)
    pub fn scale_offense(&mut self, multiplier: f64) {
        self.base.attack = (self.base.attack * multiplier).max(0.0);
    }
}
