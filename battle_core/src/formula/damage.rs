//! Damage - Attack vs defense with bounded burst

use super::constants::{MAX_PENETRATION, MIN_DAMAGE, MIN_DEFENSE};

/// Calculate the damage of one hit
///
/// Formula:
/// `e = attack * crit_mult + flat`
/// `damage = floor(max(1, e² / (e + max(1, defense))))`
///
/// The result grows roughly linearly in `e` once `e` dominates defense,
/// and approaches zero (clamped to 1) when defense dominates.
pub fn calculate_damage(attack: f64, defense: f64, crit_mult: f64, flat: f64) -> f64 {
    let effective = (attack * crit_mult + flat).max(0.0);
    let defense = defense.max(MIN_DEFENSE);

    let raw = effective * effective / (effective + defense);
    raw.max(MIN_DAMAGE).floor()
}

/// Reduce defense by a penetration fraction, clamped to [0, 0.6]
pub fn effective_defense(defense: f64, penetration: f64) -> f64 {
    let penetration = penetration.clamp(0.0, MAX_PENETRATION);
    defense.max(0.0) * (1.0 - penetration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_defense_clamps_to_one() {
        // 100² / (100 + 1) = 99.0099
        let result = calculate_damage(100.0, 0.0, 1.0, 0.0);
        assert!((result - 99.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_minimum_damage() {
        let result = calculate_damage(1.0, 10_000.0, 1.0, 0.0);
        assert!((result - 1.0).abs() < f64::EPSILON);

        let result = calculate_damage(0.0, 0.0, 1.0, 0.0);
        assert!((result - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_crit_and_flat_raise_effective_attack() {
        let base = calculate_damage(100.0, 50.0, 1.0, 0.0);
        let crit = calculate_damage(100.0, 50.0, 1.5, 0.0);
        let flat = calculate_damage(100.0, 50.0, 1.0, 25.0);
        assert!(crit > base);
        assert!(flat > base);
        // e = 150, 22500 / 200 = 112.5
        assert!((crit - 112.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_penetration_clamped() {
        assert!((effective_defense(100.0, 0.25) - 75.0).abs() < f64::EPSILON);
        assert!((effective_defense(100.0, 0.9) - 40.0).abs() < 1e-9);
        assert!((effective_defense(100.0, -0.5) - 100.0).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn damage_non_decreasing_in_attack(a in 0.0f64..10_000.0, step in 0.0f64..1_000.0, d in 0.0f64..10_000.0) {
            prop_assert!(calculate_damage(a + step, d, 1.0, 0.0) >= calculate_damage(a, d, 1.0, 0.0));
        }

        #[test]
        fn damage_non_increasing_in_defense(a in 0.0f64..10_000.0, d in 0.0f64..10_000.0, step in 0.0f64..1_000.0) {
            prop_assert!(calculate_damage(a, d + step, 1.0, 0.0) <= calculate_damage(a, d, 1.0, 0.0));
        }

        #[test]
        fn damage_is_at_least_one(a in -100.0f64..10_000.0, d in -100.0f64..10_000.0) {
            prop_assert!(calculate_damage(a, d, 1.0, 0.0) >= 1.0);
        }
    }
}
