//! Skills - declarative effect nodes and the listeners built from them

mod catalog;
mod node;

pub use catalog::{cast_skill, passive_listeners, SkillDefinition, SkillTargeting};
pub use node::{
    ApplyStatusNode, DealDamageNode, EffectNode, MagnitudeSource, NodeEffect, NodeExecutor,
    NodeInvocation, NodeTarget, ScalingStat,
};
