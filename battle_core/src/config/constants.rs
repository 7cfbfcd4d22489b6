//! Game constants configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};

/// Tunable game constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConstants {
    pub finalizer: FinalizerConstants,
    pub ranks: RankConstants,
    pub counter_goal: CounterGoalConstants,
    pub pipeline: PipelineConstants,
    pub turn: TurnConstants,
    pub rewards: RewardConstants,
}

impl GameConstants {
    /// Reject values that would break formula invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.finalizer;
        for (name, cap) in [
            ("crit", &f.crit),
            ("lifesteal", &f.lifesteal),
            ("thorns", &f.thorns),
        ] {
            if cap.hard_cap < cap.threshold {
                return Err(ConfigError::ValidationError(format!(
                    "{name} soft cap: hard_cap {} below threshold {}",
                    cap.hard_cap, cap.threshold
                )));
            }
            if cap.growth <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} soft cap: growth must be positive"
                )));
            }
        }
        if f.encounter_cap < 1.0 {
            return Err(ConfigError::ValidationError(
                "encounter_cap must be at least 1.0".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.pipeline.damage_variance) {
            return Err(ConfigError::ValidationError(
                "damage_variance must be in [0, 1)".to_string(),
            ));
        }
        if self.turn.max_turns == 0 {
            return Err(ConfigError::ValidationError(
                "max_turns must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Soft cap curve: linear up to `threshold`, then exponential approach to `hard_cap`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftCap {
    pub threshold: f64,
    pub hard_cap: f64,
    pub growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalizerConstants {
    /// Per-level multiplier step: factor = 1 + (level - 1) * step
    pub level_step: f64,
    /// Upper bound of the node encounter factor
    pub encounter_cap: f64,
    pub crit: SoftCap,
    pub lifesteal: SoftCap,
    pub thorns: SoftCap,
    /// Growth of the defense -> damage reduction curve
    pub defense_growth: f64,
    pub damage_reduction_cap: f64,
    pub penetration_cap: f64,
}

impl Default for FinalizerConstants {
    fn default() -> Self {
        FinalizerConstants {
            level_step: 0.08,
            encounter_cap: 1.65,
            crit: SoftCap {
                threshold: 0.35,
                hard_cap: 0.75,
                growth: 2.0,
            },
            lifesteal: SoftCap {
                threshold: 0.20,
                hard_cap: 0.50,
                growth: 2.5,
            },
            thorns: SoftCap {
                threshold: 0.15,
                hard_cap: 0.40,
                growth: 3.0,
            },
            defense_growth: 0.004,
            damage_reduction_cap: 0.65,
            penetration_cap: 0.6,
        }
    }
}

/// Stat multipliers per monster rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConstants {
    pub elite_hp: f64,
    pub elite_attack: f64,
    pub boss_hp: f64,
    pub boss_attack: f64,
}

impl Default for RankConstants {
    fn default() -> Self {
        RankConstants {
            elite_hp: 1.5,
            elite_attack: 1.2,
            boss_hp: 2.5,
            boss_attack: 1.35,
        }
    }
}

/// Boss offense multipliers after the counter goal check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterGoalConstants {
    /// Applied when the player meets the goal (weakens the boss)
    pub pass_multiplier: f64,
    /// Applied when the player misses the goal (strengthens the boss)
    pub fail_multiplier: f64,
}

impl Default for CounterGoalConstants {
    fn default() -> Self {
        CounterGoalConstants {
            pass_multiplier: 0.92,
            fail_multiplier: 1.18,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConstants {
    /// Uniform damage roll in [1 - variance, 1 + variance]
    pub damage_variance: f64,
    /// Upper clamp of the thorns reflection fraction
    pub thorns_cap: f64,
    /// Upper clamp of the damage reduction modifier
    pub reduction_cap: f64,
    /// Bonus damage of an element reaction, as a fraction of target max hp
    pub reaction_fraction: f64,
}

impl Default for PipelineConstants {
    fn default() -> Self {
        PipelineConstants {
            damage_variance: 0.1,
            thorns_cap: 0.4,
            reduction_cap: 0.95,
            reaction_fraction: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConstants {
    /// Circuit breaker for runs that never leave `Fighting`
    pub max_turns: u32,
    /// Dispatch rounds for listener-emitted events
    pub max_listener_depth: u32,
    /// Enemies with skills cast on every n-th turn
    pub enemy_skill_cadence: u32,
}

impl Default for TurnConstants {
    fn default() -> Self {
        TurnConstants {
            max_turns: 300,
            max_listener_depth: 4,
            enemy_skill_cadence: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConstants {
    /// XP to next level = xp_base * level ^ xp_exponent
    pub xp_base: f64,
    pub xp_exponent: f64,
}

impl Default for RewardConstants {
    fn default() -> Self {
        RewardConstants {
            xp_base: 100.0,
            xp_exponent: 1.5,
        }
    }
}

impl RewardConstants {
    pub fn xp_to_next(&self, level: u32) -> u32 {
        (self.xp_base * (level.max(1) as f64).powf(self.xp_exponent)).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = GameConstants::default();
        assert!((constants.finalizer.level_step - 0.08).abs() < f64::EPSILON);
        assert!((constants.finalizer.encounter_cap - 1.65).abs() < f64::EPSILON);
        assert_eq!(constants.turn.max_turns, 300);
        assert!(constants.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
[pipeline]
damage_variance = 0.0

[turn]
max_turns = 50
"#;

        let constants: GameConstants = toml::from_str(toml).unwrap();
        assert!((constants.pipeline.damage_variance - 0.0).abs() < f64::EPSILON);
        assert!((constants.pipeline.thorns_cap - 0.4).abs() < f64::EPSILON);
        assert_eq!(constants.turn.max_turns, 50);
        assert_eq!(constants.turn.enemy_skill_cadence, 3);
    }

    #[test]
    fn test_validate_rejects_inverted_soft_cap() {
        let mut constants = GameConstants::default();
        constants.finalizer.crit.hard_cap = 0.1;
        assert!(matches!(
            constants.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_xp_curve() {
        let rewards = RewardConstants::default();
        assert_eq!(rewards.xp_to_next(1), 100);
        assert_eq!(rewards.xp_to_next(4), 800);
    }
}
