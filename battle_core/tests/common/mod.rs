//! Shared fixtures for integration tests

#![allow(dead_code)]

use battle_core::event::Trigger;
use battle_core::listener::ListenerScope;
use battle_core::prelude::*;
use battle_core::skill::{DealDamageNode, EffectNode, NodeEffect, NodeTarget, SkillDefinition, SkillTargeting};
use battle_core::unit::{BaseStats, DerivedStats, UnitMetadata};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const PLAYER: &str = "player";

/// Content, constants and localizer for hand-built sessions
pub struct Fixture {
    pub content: ContentLibrary,
    pub constants: GameConstants,
    pub localizer: EnglishLocalizer,
}

impl Fixture {
    /// No variance; crits only when a unit has crit rate
    pub fn new() -> Self {
        let mut constants = GameConstants::default();
        constants.pipeline.damage_variance = 0.0;
        Fixture {
            content: ContentLibrary::default(),
            constants,
            localizer: EnglishLocalizer,
        }
    }

    pub fn with_skill(mut self, skill: SkillDefinition) -> Self {
        self.content.insert_skill(skill);
        self
    }

    pub fn engine(&self) -> BattleEngine<'_> {
        BattleEngine::new(&self.content, &self.constants, &self.localizer)
    }
}

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn unit(id: &str, faction: Faction, hp: u32, attack: f64) -> CombatUnit {
    CombatUnit {
        id: id.to_string(),
        name: id.to_string(),
        faction,
        level: 1,
        base: BaseStats {
            hp,
            attack,
            defense: 0.0,
        },
        current_hp: hp,
        derived: DerivedStats::default(),
        skills: Vec::new(),
        passives: Vec::new(),
        elements: Vec::new(),
        statuses: Vec::new(),
        listeners: Vec::new(),
        metadata: UnitMetadata::default(),
    }
}

pub fn player(hp: u32, attack: f64) -> CombatUnit {
    unit(PLAYER, Faction::Player, hp, attack)
}

pub fn monster(id: &str, wave: &str, hp: u32, attack: f64) -> CombatUnit {
    let mut m = unit(id, Faction::Monster, hp, attack);
    m.metadata.wave_id = Some(wave.to_string());
    m
}

pub fn session(player: CombatUnit, enemies: Vec<CombatUnit>) -> BattleSession {
    BattleSession::new("test", "chapter", "node", player, enemies)
}

pub fn damage_node(id: &str, trigger: Trigger, target: NodeTarget) -> EffectNode {
    EffectNode {
        id: id.to_string(),
        trigger,
        scope: ListenerScope::Source,
        effect: NodeEffect::DealDamage(DealDamageNode {
            target,
            ..Default::default()
        }),
    }
}

pub fn skill(id: &str, target: SkillTargeting, nodes: Vec<EffectNode>) -> SkillDefinition {
    SkillDefinition {
        id: id.to_string(),
        name: id.to_string(),
        element: None,
        target,
        nodes,
    }
}

/// Damage events from `source` to `target` of one kind
pub fn hits(session: &BattleSession, source: &str, target: &str, kind: battle_core::event::DamageKind) -> Vec<u32> {
    session
        .events
        .iter()
        .filter_map(|record| match &record.event {
            BattleEvent::DamageApplied {
                source_id,
                target_id,
                amount,
                kind: k,
                ..
            } if source_id == source && target_id == target && *k == kind => Some(*amount),
            _ => None,
        })
        .collect()
}
