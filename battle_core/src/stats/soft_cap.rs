//! Soft caps - linear below a threshold, exponential approach to a hard cap above it

use crate::config::SoftCap;

/// Apply a soft cap to a percent stat
///
/// Below `threshold` the value passes through unchanged. Above it:
/// `threshold + (hard_cap - threshold) * (1 - e^(-growth * overflow))`
pub fn apply_soft_cap(value: f64, cap: &SoftCap) -> f64 {
    if value <= cap.threshold {
        return value.max(0.0);
    }
    let overflow = value - cap.threshold;
    let headroom = cap.hard_cap - cap.threshold;
    cap.threshold + headroom * (1.0 - (-cap.growth * overflow).exp())
}

/// Convert defense into a damage reduction fraction
///
/// `1 - e^(-growth * defense)`, capped at `cap`.
pub fn defense_to_reduction(defense: f64, growth: f64, cap: f64) -> f64 {
    if defense <= 0.0 {
        return 0.0;
    }
    (1.0 - (-growth * defense).exp()).min(cap)
}
