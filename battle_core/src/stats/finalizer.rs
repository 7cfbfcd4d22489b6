//! StatFinalizer - Level/encounter scaling and soft caps
//!
//! Pure and RNG-free: the same inputs always give the same stats.

use super::soft_cap::{apply_soft_cap, defense_to_reduction};
use super::{FinalStats, ProgressionStats};
use crate::config::FinalizerConstants;

/// Scaling inputs for one finalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaling {
    pub level: u32,
    /// Node difficulty multiplier, capped by `encounter_cap`
    pub encounter_factor: f64,
}

impl Scaling {
    pub fn level(level: u32) -> Self {
        Scaling {
            level,
            encounter_factor: 1.0,
        }
    }
}

/// Derives final combat stats from raw progression stats
pub struct StatFinalizer<'a> {
    constants: &'a FinalizerConstants,
}

impl<'a> StatFinalizer<'a> {
    pub fn new(constants: &'a FinalizerConstants) -> Self {
        StatFinalizer { constants }
    }

    /// `1 + (level - 1) * step`
    pub fn level_factor(&self, level: u32) -> f64 {
        1.0 + (level.max(1) - 1) as f64 * self.constants.level_step
    }

    /// Encounter factor clamped to [1, encounter_cap]
    pub fn encounter_factor(&self, factor: f64) -> f64 {
        factor.clamp(1.0, self.constants.encounter_cap)
    }

    /// Compute final stats
    pub fn finalize(&self, raw: &ProgressionStats, scaling: Scaling) -> FinalStats {
        let c = self.constants;
        let scale = self.level_factor(scaling.level) * self.encounter_factor(scaling.encounter_factor);

        let max_hp = (raw.hp * scale).floor().max(1.0) as u32;
        let attack = (raw.attack * scale).max(0.0);
        let defense = (raw.defense * scale).max(0.0);

        FinalStats {
            max_hp,
            attack,
            defense,
            damage_reduction: defense_to_reduction(defense, c.defense_growth, c.damage_reduction_cap),
            crit_rate: apply_soft_cap(raw.crit_rate, &c.crit),
            crit_damage: raw.crit_damage.max(0.0),
            lifesteal_rate: apply_soft_cap(raw.lifesteal, &c.lifesteal),
            thorns_rate: apply_soft_cap(raw.thorns, &c.thorns),
            elemental_bonus: raw.elemental_bonus.max(0.0),
            penetration: raw.penetration.clamp(0.0, c.penetration_cap),
        }
    }
}
