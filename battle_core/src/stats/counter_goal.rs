//! Counter goal - adaptive boss difficulty keyed on one player stat

use super::FinalStats;
use crate::config::CounterGoalConstants;
use serde::{Deserialize, Serialize};

/// Final player stat a counter goal inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStat {
    MaxHp,
    Attack,
    Defense,
    CritRate,
    Lifesteal,
    Thorns,
    ElementalBonus,
}

/// Boss-specific check: player stat >= threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterGoal {
    pub stat: GoalStat,
    pub threshold: f64,
}

/// Result of a counter goal check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalOutcome {
    Passed,
    Failed,
}

impl CounterGoal {
    /// Read the designated stat from the player's final stats
    pub fn player_value(&self, player: &FinalStats) -> f64 {
        match self.stat {
            GoalStat::MaxHp => player.max_hp as f64,
            GoalStat::Attack => player.attack,
            GoalStat::Defense => player.defense,
            GoalStat::CritRate => player.crit_rate,
            GoalStat::Lifesteal => player.lifesteal_rate,
            GoalStat::Thorns => player.thorns_rate,
            GoalStat::ElementalBonus => player.elemental_bonus,
        }
    }

    pub fn evaluate(&self, player: &FinalStats) -> GoalOutcome {
        if self.player_value(player) >= self.threshold {
            GoalOutcome::Passed
        } else {
            GoalOutcome::Failed
        }
    }
}

impl GoalOutcome {
    /// Multiplier applied to the boss's offense
    pub fn boss_multiplier(self, constants: &CounterGoalConstants) -> f64 {
        match self {
            GoalOutcome::Passed => constants.pass_multiplier,
            GoalOutcome::Failed => constants.fail_multiplier,
        }
    }
}
