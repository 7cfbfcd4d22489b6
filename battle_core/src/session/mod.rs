//! Sessions - player progression around battles
//!
//! Builds battle sessions from map content and turns finished battles into
//! rewards, drops, map unlocks and history entries.

mod builder;
mod defaults;
mod outcome;
mod ports;

pub use builder::{SessionBuilder, SessionStart};
pub use defaults::{LinearMapProgress, WeightedDropTable};
pub use outcome::{NodeOutcome, NodeStatus, Rewards};
pub use ports::{Collaborators, DropContext, DropGenerator, DropResult, MapProgressService, ProgressUpdate};

use crate::battle::{BattleSession, PlayerCommand};
use crate::content::{Chapter, PlayerPreset};
use crate::stats::ProgressionStats;
use crate::types::{Element, Faction, Rarity};
use crate::unit::UnitSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Session assembly or resolution error
///
/// Every variant leaves the caller's state untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Unknown chapter: {0}")]
    UnknownChapter(String),
    #[error("Unknown node {node_id} in chapter {chapter_id}")]
    UnknownNode { chapter_id: String, node_id: String },
    #[error("Node {node_id} in chapter {chapter_id} has no waves")]
    NoWaves { chapter_id: String, node_id: String },
    #[error("Node {node_id} in chapter {chapter_id} has no monsters")]
    EmptyEncounter { chapter_id: String, node_id: String },
    #[error("Unknown monster: {0}")]
    UnknownMonster(String),
    #[error("No active session")]
    NoActiveSession,
    #[error("Session {0} is still in progress")]
    SessionInProgress(String),
}

/// Key identifying a node across chapters
pub fn node_key(chapter_id: &str, node_id: &str) -> String {
    format!("{chapter_id}:{node_id}")
}

/// Chapter-qualified node reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub chapter_id: String,
    pub node_id: String,
}

/// A dropped item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub level: u32,
    pub power: u32,
}

/// Per-rarity bad-luck counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityState {
    #[serde(default)]
    pub counters: BTreeMap<Rarity, u32>,
}

impl PityState {
    pub fn get(&self, rarity: Rarity) -> u32 {
        self.counters.get(&rarity).copied().unwrap_or(0)
    }

    pub fn increment_all(&mut self) {
        for rarity in Rarity::all() {
            *self.counters.entry(*rarity).or_insert(0) += 1;
        }
    }

    pub fn reset(&mut self, rarity: Rarity) {
        self.counters.insert(rarity, 0);
    }
}

/// One finished (or abandoned) battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub session_id: String,
    pub chapter_id: String,
    pub node_id: String,
    pub won: bool,
    #[serde(default)]
    pub retreated: bool,
    pub turns: u32,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub drop: Option<Equipment>,
}

/// Unlocked and cleared map content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapProgress {
    #[serde(default)]
    pub unlocked_chapters: BTreeSet<String>,
    /// Node keys (`chapter:node`)
    #[serde(default)]
    pub unlocked_nodes: BTreeSet<String>,
    #[serde(default)]
    pub cleared_nodes: BTreeSet<String>,
}

impl MapProgress {
    /// Progress with the first node of the first chapter unlocked
    pub fn starting(chapters: &[Chapter]) -> Self {
        let mut progress = MapProgress::default();
        if let Some(chapter) = chapters.first() {
            progress.unlocked_chapters.insert(chapter.id.clone());
            if let Some(node) = chapter.nodes.first() {
                progress.unlocked_nodes.insert(node_key(&chapter.id, &node.id));
            }
        }
        progress
    }

    pub fn is_unlocked(&self, chapter_id: &str, node_id: &str) -> bool {
        self.unlocked_nodes.contains(&node_key(chapter_id, node_id))
    }

    pub fn is_cleared(&self, chapter_id: &str, node_id: &str) -> bool {
        self.cleared_nodes.contains(&node_key(chapter_id, node_id))
    }
}

/// Persistent player progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub gold: u32,
    pub stats: ProgressionStats,

    // === Abilities ===
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub passives: Vec<String>,
    #[serde(default)]
    pub elements: Vec<Element>,

    // === Loot ===
    #[serde(default)]
    pub pity: PityState,
    #[serde(default)]
    pub inventory: Vec<Equipment>,

    // === History ===
    #[serde(default)]
    pub history: Vec<BattleRecord>,
    /// Failures per node key
    #[serde(default)]
    pub failures: BTreeMap<String, u32>,
    #[serde(default)]
    pub sessions_started: u32,
    #[serde(default)]
    pub active_session: Option<BattleSession>,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, level: u32, stats: ProgressionStats) -> Self {
        PlayerState {
            name: name.into(),
            level: level.max(1),
            xp: 0,
            gold: 0,
            stats,
            skills: Vec::new(),
            passives: Vec::new(),
            elements: Vec::new(),
            pity: PityState::default(),
            inventory: Vec::new(),
            history: Vec::new(),
            failures: BTreeMap::new(),
            sessions_started: 0,
            active_session: None,
        }
    }

    pub fn from_preset(preset: &PlayerPreset, level: u32) -> Self {
        let mut player = PlayerState::new(preset.name.clone(), level, preset.stats.clone());
        player.skills = preset.skills.clone();
        player.passives = preset.passives.clone();
        player.elements = preset.elements.clone();
        player
    }

    pub fn schema(&self) -> UnitSchema {
        UnitSchema {
            name: self.name.clone(),
            faction: Faction::Player,
            rank: Default::default(),
            stats: self.stats.clone(),
            skills: self.skills.clone(),
            passives: self.passives.clone(),
            elements: self.elements.clone(),
        }
    }

    pub fn failures_at(&self, chapter_id: &str, node_id: &str) -> u32 {
        self.failures
            .get(&node_key(chapter_id, node_id))
            .copied()
            .unwrap_or(0)
    }

    /// Queue a command for the next turn of the active session
    pub fn queue_command(&mut self, command: PlayerCommand) -> Result<(), SessionError> {
        let session = self
            .active_session
            .as_mut()
            .ok_or(SessionError::NoActiveSession)?;
        session.queued_command = Some(command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pity_counters() {
        let mut pity = PityState::default();
        pity.increment_all();
        pity.increment_all();
        pity.reset(Rarity::Common);
        assert_eq!(pity.get(Rarity::Common), 0);
        assert_eq!(pity.get(Rarity::Legendary), 2);
    }

    #[test]
    fn test_pity_json_keys() {
        let mut pity = PityState::default();
        pity.increment_all();
        let json = serde_json::to_string(&pity).unwrap();
        assert!(json.contains("\"legendary\":1"));
        let back: PityState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pity);
    }

    #[test]
    fn test_queue_command_requires_session() {
        let mut player = PlayerState::new("Hero", 1, ProgressionStats::default());
        let result = player.queue_command(PlayerCommand::Attack { target_id: None });
        assert_eq!(result, Err(SessionError::NoActiveSession));
    }
}
