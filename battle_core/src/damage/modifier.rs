//! Damage modifiers - ordered adjustments applied after the base formula

use crate::status::total_of_kind;
use crate::types::{Element, StatusKind};
use crate::unit::CombatUnit;
use serde::{Deserialize, Serialize};

/// What a modifier can inspect
pub struct ModifierContext<'a> {
    pub source: &'a CombatUnit,
    pub target: &'a CombatUnit,
    pub element: Element,
    /// Upper clamp for `Reduction`
    pub reduction_cap: f64,
}

/// One step of the modifier chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DamageModifier {
    /// Flat multiplier
    Scale(f64),
    /// Source elemental bonus, elemental hits only
    ElementalBonus,
    /// Source buffs: `1 + sum(magnitude * stacks)`
    Empower,
    /// Target debuffs: `1 + sum(magnitude * stacks)`
    Vulnerable,
    /// Target damage reduction fraction
    Reduction,
    /// Target shields absorb a flat amount
    Absorb,
}

impl DamageModifier {
    pub fn apply(&self, damage: f64, ctx: &ModifierContext<'_>) -> f64 {
        let adjusted = match self {
            DamageModifier::Scale(factor) => damage * factor,
            DamageModifier::ElementalBonus => {
                if ctx.element.is_elemental() {
                    damage * (1.0 + ctx.source.derived.elemental_bonus.max(0.0))
                } else {
                    damage
                }
            }
            DamageModifier::Empower => {
                damage * (1.0 + total_of_kind(&ctx.source.statuses, StatusKind::Buff).max(0.0))
            }
            DamageModifier::Vulnerable => {
                damage * (1.0 + total_of_kind(&ctx.target.statuses, StatusKind::Debuff).max(0.0))
            }
            DamageModifier::Reduction => {
                let reduction = ctx.target.derived.damage_reduction.clamp(0.0, ctx.reduction_cap);
                damage * (1.0 - reduction)
            }
            DamageModifier::Absorb => {
                damage - total_of_kind(&ctx.target.statuses, StatusKind::Shield).max(0.0)
            }
        };
        adjusted.max(0.0)
    }
}

/// Modifiers every hit goes through, in order
pub fn standard_chain() -> Vec<DamageModifier> {
    vec![
        DamageModifier::ElementalBonus,
        DamageModifier::Empower,
        DamageModifier::Vulnerable,
        DamageModifier::Reduction,
        DamageModifier::Absorb,
    ]
}
