//! Combat math - pure damage, crit, defense and lifesteal formulas

mod crit;
mod damage;

pub use crit::{crit_multiplier, effective_lifesteal};
pub use damage::{calculate_damage, effective_defense};

/// Formula constants
pub mod constants {
    /// Defense never drops below this in the damage formula (no division by zero)
    pub const MIN_DEFENSE: f64 = 1.0;

    /// Every hit deals at least this much
    pub const MIN_DAMAGE: f64 = 1.0;

    /// Penetration is clamped to [0, MAX_PENETRATION]
    pub const MAX_PENETRATION: f64 = 0.6;

    /// Diminishing factor applied to crit damage
    pub const CRIT_DAMAGE_DIMINISH: f64 = 0.6;
}
