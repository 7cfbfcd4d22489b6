//! UnitFactory - Build runtime combat units from a schema and a level

use super::{BaseStats, CombatUnit, DerivedStats, UnitMetadata};
use crate::config::GameConstants;
use crate::stats::{FinalStats, ProgressionStats, Scaling, StatFinalizer};
use crate::types::{Element, EnemyRank, Faction};
use serde::{Deserialize, Serialize};

/// Everything needed to build a unit except its level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSchema {
    pub name: String,
    pub faction: Faction,
    #[serde(default)]
    pub rank: EnemyRank,
    pub stats: ProgressionStats,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub passives: Vec<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// Builds combat units through the stat finalizer
pub struct UnitFactory<'a> {
    constants: &'a GameConstants,
}

impl<'a> UnitFactory<'a> {
    pub fn new(constants: &'a GameConstants) -> Self {
        UnitFactory { constants }
    }

    /// Build a unit at full hp
    ///
    /// Rank multipliers apply to hp and attack after level/encounter scaling.
    pub fn build(&self, id: impl Into<String>, schema: &UnitSchema, scaling: Scaling) -> CombatUnit {
        let finalizer = StatFinalizer::new(&self.constants.finalizer);
        let mut stats = finalizer.finalize(&schema.stats, scaling);
        self.apply_rank(&mut stats, schema.rank);

        CombatUnit {
            id: id.into(),
            name: schema.name.clone(),
            faction: schema.faction,
            level: scaling.level.max(1),
            base: BaseStats {
                hp: stats.max_hp,
                attack: stats.attack,
                defense: stats.defense,
            },
            current_hp: stats.max_hp,
            derived: DerivedStats {
                damage_reduction: stats.damage_reduction,
                crit_rate: stats.crit_rate,
                crit_damage: stats.crit_damage,
                lifesteal_rate: stats.lifesteal_rate,
                thorns_rate: stats.thorns_rate,
                elemental_bonus: stats.elemental_bonus,
                penetration: stats.penetration,
            },
            skills: schema.skills.clone(),
            passives: schema.passives.clone(),
            elements: schema.elements.clone(),
            statuses: Vec::new(),
            listeners: Vec::new(),
            metadata: UnitMetadata {
                rank: schema.rank,
                ..Default::default()
            },
        }
    }

    fn apply_rank(&self, stats: &mut FinalStats, rank: EnemyRank) {
        let ranks = &self.constants.ranks;
        let (hp_mult, attack_mult) = match rank {
            EnemyRank::Normal => return,
            EnemyRank::Elite => (ranks.elite_hp, ranks.elite_attack),
            EnemyRank::Boss => (ranks.boss_hp, ranks.boss_attack),
        };
        stats.max_hp = ((stats.max_hp as f64) * hp_mult).floor().max(1.0) as u32;
        stats.attack *= attack_mult;
    }
}
