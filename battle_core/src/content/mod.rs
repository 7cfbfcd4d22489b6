//! Content catalog - monsters, skills, chapters and drop tables
//!
//! The engine only reads content through [`ContentCatalog`], so tests can run
//! against fixture catalogs.

use crate::skill::SkillDefinition;
use crate::stats::{CounterGoal, ProgressionStats};
use crate::types::{Element, EnemyRank, Faction, Rarity};
use crate::unit::UnitSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_count() -> u32 {
    1
}

fn default_level() -> u32 {
    1
}

fn default_encounter_factor() -> f64 {
    1.0
}

/// Read-only content lookups
pub trait ContentCatalog {
    fn monster(&self, id: &str) -> Option<&MonsterTemplate>;
    fn skill(&self, id: &str) -> Option<&SkillDefinition>;
    fn chapters(&self) -> &[Chapter];

    fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters().iter().find(|c| c.id == id)
    }
}

/// Monster definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rank: EnemyRank,
    pub stats: ProgressionStats,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub passives: Vec<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
    /// XP per node level
    #[serde(default)]
    pub xp: u32,
    /// Gold per node level
    #[serde(default)]
    pub gold: u32,
    /// Boss-only adaptive difficulty check
    #[serde(default)]
    pub counter_goal: Option<CounterGoal>,
}

impl MonsterTemplate {
    pub fn schema(&self) -> UnitSchema {
        UnitSchema {
            name: self.name.clone(),
            faction: Faction::Monster,
            rank: self.rank,
            stats: self.stats.clone(),
            skills: self.skills.clone(),
            passives: self.passives.clone(),
            elements: self.elements.clone(),
        }
    }
}

/// `count` copies of one monster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveEntry {
    pub monster_id: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSpec {
    /// Synthesized as `wave-N` when absent
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub monsters: Vec<WaveEntry>,
}

/// One battle location on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapNode {
    pub id: String,
    pub name: String,
    /// Monster level
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default = "default_encounter_factor")]
    pub encounter_factor: f64,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub waves: Vec<WaveSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<MapNode>,
}

impl Chapter {
    pub fn node(&self, id: &str) -> Option<&MapNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Starting build for a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPreset {
    pub id: String,
    pub name: String,
    pub stats: ProgressionStats,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub passives: Vec<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// Weight and pity threshold of one rarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityWeight {
    pub rarity: Rarity,
    pub weight: f64,
    /// Rolls without this rarity before it is forced
    #[serde(default)]
    pub pity: Option<u32>,
}

/// Equipment drop table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTableConfig {
    /// Chance that a victory rolls a drop at all
    pub drop_chance: f64,
    /// Weight bonus for rare-or-better rarities against elites
    #[serde(default)]
    pub elite_bonus: f64,
    /// Weight bonus for rare-or-better rarities against bosses
    #[serde(default)]
    pub boss_bonus: f64,
    #[serde(default)]
    pub rarities: Vec<RarityWeight>,
}

impl Default for DropTableConfig {
    fn default() -> Self {
        DropTableConfig {
            drop_chance: 0.5,
            elite_bonus: 0.0,
            boss_bonus: 0.0,
            rarities: vec![RarityWeight {
                rarity: Rarity::Common,
                weight: 1.0,
                pity: None,
            }],
        }
    }
}

/// Content file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub monsters: Vec<MonsterTemplate>,
    #[serde(default)]
    pub skills: Vec<SkillDefinition>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub presets: Vec<PlayerPreset>,
    #[serde(default)]
    pub drops: DropTableConfig,
}

/// Indexed content, the default [`ContentCatalog`]
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    monsters: HashMap<String, MonsterTemplate>,
    skills: HashMap<String, SkillDefinition>,
    chapters: Vec<Chapter>,
    presets: Vec<PlayerPreset>,
    drops: DropTableConfig,
}

impl ContentLibrary {
    pub fn from_file(file: ContentFile) -> Self {
        let mut library = ContentLibrary {
            chapters: file.chapters,
            presets: file.presets,
            drops: file.drops,
            ..Default::default()
        };
        for monster in file.monsters {
            library.monsters.insert(monster.id.clone(), monster);
        }
        for skill in file.skills {
            library.skills.insert(skill.id.clone(), skill);
        }
        library
    }

    pub fn insert_monster(&mut self, monster: MonsterTemplate) {
        self.monsters.insert(monster.id.clone(), monster);
    }

    pub fn insert_skill(&mut self, skill: SkillDefinition) {
        self.skills.insert(skill.id.clone(), skill);
    }

    pub fn push_chapter(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }

    pub fn preset(&self, id: &str) -> Option<&PlayerPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn presets(&self) -> &[PlayerPreset] {
        &self.presets
    }

    pub fn drop_table(&self) -> &DropTableConfig {
        &self.drops
    }

    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    /// Skill ids referenced by monsters or presets that do not exist
    pub fn missing_skills(&self) -> Vec<String> {
        let referenced = self
            .monsters
            .values()
            .flat_map(|m| m.skills.iter().chain(m.passives.iter()))
            .chain(
                self.presets
                    .iter()
                    .flat_map(|p| p.skills.iter().chain(p.passives.iter())),
            );
        let mut missing: Vec<String> = referenced
            .filter(|id| !self.skills.contains_key(id.as_str()))
            .cloned()
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}

impl ContentCatalog for ContentLibrary {
    fn monster(&self, id: &str) -> Option<&MonsterTemplate> {
        self.monsters.get(id)
    }

    fn skill(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }
}
