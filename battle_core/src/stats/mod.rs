//! Stat finalization - raw progression stats to final combat stats

mod counter_goal;
mod finalizer;
mod soft_cap;

pub use counter_goal::{CounterGoal, GoalOutcome, GoalStat};
pub use finalizer::{Scaling, StatFinalizer};
pub use soft_cap::{apply_soft_cap, defense_to_reduction};

use serde::{Deserialize, Serialize};

/// Raw stats before level/encounter scaling and soft caps
///
/// Used both for player progression and monster templates.
/// Percent stats are fractions (0.25 = 25%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressionStats {
    // === Core ===
    pub hp: f64,
    pub attack: f64,
    #[serde(default)]
    pub defense: f64,

    // === Percent stats ===
    #[serde(default)]
    pub crit_rate: f64,
    #[serde(default)]
    pub crit_damage: f64,
    #[serde(default)]
    pub lifesteal: f64,
    #[serde(default)]
    pub thorns: f64,
    #[serde(default)]
    pub elemental_bonus: f64,
    #[serde(default)]
    pub penetration: f64,
}

/// Final combat stats, ready to become a combat unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalStats {
    pub max_hp: u32,
    pub attack: f64,
    pub defense: f64,
    /// Fraction of incoming damage removed, derived from defense
    pub damage_reduction: f64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub lifesteal_rate: f64,
    pub thorns_rate: f64,
    pub elemental_bonus: f64,
    pub penetration: f64,
}
