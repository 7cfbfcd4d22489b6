//! Damage pipeline - one damage instance from roll to events

mod modifier;
mod pipeline;

pub use modifier::{standard_chain, DamageModifier, ModifierContext};
pub use pipeline::{resolve_damage, DamageOutcome, DamageRequest};
