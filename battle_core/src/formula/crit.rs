//! Crit and lifesteal curves with diminishing returns

use super::constants::CRIT_DAMAGE_DIMINISH;

/// Damage multiplier of a hit
///
/// `1` when the hit did not crit, otherwise
/// `1 + crit_damage / (1 + crit_damage * 0.6)`.
pub fn crit_multiplier(is_crit: bool, crit_damage: f64) -> f64 {
    if !is_crit {
        return 1.0;
    }
    let crit_damage = crit_damage.max(0.0);
    1.0 + crit_damage / (1.0 + crit_damage * CRIT_DAMAGE_DIMINISH)
}

/// Fraction of dealt damage returned as healing
///
/// `rate / (1 + rate)`: 100% nominal lifesteal heals 50%.
pub fn effective_lifesteal(rate: f64) -> f64 {
    if rate <= 0.0 {
        return 0.0;
    }
    rate / (1.0 + rate)
}
