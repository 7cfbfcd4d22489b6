//! Battle sessions and the turn loop

mod engine;
mod turn;

pub use engine::BattleEngine;
pub use turn::{advance_waves, resolve_turn};

use crate::event::EventRecord;
use crate::types::{BattlePhase, BattleStatus};
use crate::unit::CombatUnit;
use serde::{Deserialize, Serialize};

/// Player choice for the next turn; without one the player basic-attacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerCommand {
    Attack {
        #[serde(default)]
        target_id: Option<String>,
    },
    CastSkill {
        skill_id: String,
        #[serde(default)]
        target_id: Option<String>,
    },
}

/// One battle in progress, exclusively owned by its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSession {
    pub id: String,
    pub chapter_id: String,
    pub node_id: String,
    pub turn: u32,
    pub phase: BattlePhase,
    pub status: BattleStatus,

    // === Units ===
    pub player: CombatUnit,
    pub enemies: Vec<CombatUnit>,

    // === Waves ===
    pub wave_order: Vec<String>,
    pub current_wave_index: usize,

    // === Output ===
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub logs: Vec<String>,

    // === Bookkeeping ===
    #[serde(default)]
    pub queued_command: Option<PlayerCommand>,
    /// Sequence number of the next emitted event
    #[serde(default)]
    pub next_event_seq: u64,
    /// Records below this sequence number have been applied
    #[serde(default)]
    pub applied_event_seq: u64,
}

impl BattleSession {
    /// Assemble a fresh session; derives wave order from enemy wave ids
    pub fn new(
        id: impl Into<String>,
        chapter_id: impl Into<String>,
        node_id: impl Into<String>,
        player: CombatUnit,
        mut enemies: Vec<CombatUnit>,
    ) -> Self {
        let wave_order = derive_wave_order(&mut enemies);
        let mut session = BattleSession {
            id: id.into(),
            chapter_id: chapter_id.into(),
            node_id: node_id.into(),
            turn: 0,
            phase: BattlePhase::PlayerInput,
            status: BattleStatus::Fighting,
            player,
            enemies,
            wave_order,
            current_wave_index: 0,
            events: Vec::new(),
            logs: Vec::new(),
            queued_command: None,
            next_event_seq: 0,
            applied_event_seq: 0,
        };
        if let Some(first) = session.next_live_wave() {
            session.current_wave_index = first;
        }
        session
    }

    pub fn unit(&self, id: &str) -> Option<&CombatUnit> {
        if self.player.id == id {
            return Some(&self.player);
        }
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn unit_mut(&mut self, id: &str) -> Option<&mut CombatUnit> {
        if self.player.id == id {
            return Some(&mut self.player);
        }
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Player first, then enemies in array order
    pub fn units(&self) -> impl Iterator<Item = &CombatUnit> {
        std::iter::once(&self.player).chain(self.enemies.iter())
    }

    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut CombatUnit> {
        std::iter::once(&mut self.player).chain(self.enemies.iter_mut())
    }

    pub fn current_wave_id(&self) -> Option<&str> {
        self.wave_order.get(self.current_wave_index).map(String::as_str)
    }

    /// Living enemies of one wave, in array order
    pub fn living_in_wave(&self, index: usize) -> Vec<&CombatUnit> {
        let Some(wave_id) = self.wave_order.get(index) else {
            return Vec::new();
        };
        self.enemies
            .iter()
            .filter(|e| e.is_alive() && e.metadata.wave_id.as_deref() == Some(wave_id.as_str()))
            .collect()
    }

    pub fn living_in_current_wave(&self) -> Vec<&CombatUnit> {
        self.living_in_wave(self.current_wave_index)
    }

    pub fn wave_cleared(&self, index: usize) -> bool {
        self.living_in_wave(index).is_empty()
    }

    /// First wave at or after the current one with a living enemy
    pub fn next_live_wave(&self) -> Option<usize> {
        (self.current_wave_index..self.wave_order.len()).find(|&i| !self.wave_cleared(i))
    }

    pub fn has_living_enemies(&self) -> bool {
        self.enemies.iter().any(|e| e.is_alive())
    }

    /// Settle victory/defeat; a terminal status also finishes the phase
    pub fn check_outcome(&mut self) -> BattleStatus {
        if self.status.is_terminal() {
            return self.status;
        }
        if !self.player.is_alive() {
            self.status = BattleStatus::Defeat;
        } else if !self.has_living_enemies() {
            self.status = BattleStatus::Victory;
        }
        if self.status.is_terminal() {
            self.phase = BattlePhase::Finished;
        }
        self.status
    }
}

/// Wave ids in order of first appearance
///
/// An untagged enemy joins the wave of the enemy before it (`wave-1` if it
/// comes first); the synthesized id is written into its metadata.
pub fn derive_wave_order(enemies: &mut [CombatUnit]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut previous: Option<String> = None;

    for enemy in enemies.iter_mut() {
        let wave_id = match &enemy.metadata.wave_id {
            Some(id) => id.clone(),
            None => previous.clone().unwrap_or_else(|| "wave-1".to_string()),
        };
        enemy.metadata.wave_id = Some(wave_id.clone());
        if !order.contains(&wave_id) {
            order.push(wave_id.clone());
        }
        previous = Some(wave_id);
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Faction;
    use crate::unit::{BaseStats, DerivedStats, UnitMetadata};

    fn unit(id: &str, faction: Faction, wave: Option<&str>) -> CombatUnit {
        CombatUnit {
            id: id.to_string(),
            name: id.to_string(),
            faction,
            level: 1,
            base: BaseStats {
                hp: 30,
                attack: 5.0,
                defense: 0.0,
            },
            current_hp: 30,
            derived: DerivedStats::default(),
            skills: Vec::new(),
            passives: Vec::new(),
            elements: Vec::new(),
            statuses: Vec::new(),
            listeners: Vec::new(),
            metadata: UnitMetadata {
                wave_id: wave.map(str::to_string),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_wave_order_first_appearance() {
        let mut enemies = vec![
            unit("a", Faction::Monster, Some("front")),
            unit("b", Faction::Monster, None),
            unit("c", Faction::Monster, Some("rear")),
            unit("d", Faction::Monster, Some("front")),
        ];
        let order = derive_wave_order(&mut enemies);
        assert_eq!(order, vec!["front".to_string(), "rear".to_string()]);
        assert_eq!(enemies[1].metadata.wave_id.as_deref(), Some("front"));
    }

    #[test]
    fn test_untagged_enemies_synthesize_wave() {
        let mut enemies = vec![unit("a", Faction::Monster, None)];
        assert_eq!(derive_wave_order(&mut enemies), vec!["wave-1".to_string()]);
    }

    #[test]
    fn test_outcome_detection() {
        let player = unit("hero", Faction::Player, None);
        let enemies = vec![unit("a", Faction::Monster, Some("w1"))];
        let mut session = BattleSession::new("s", "c", "n", player, enemies);
        assert_eq!(session.check_outcome(), BattleStatus::Fighting);

        session.enemies[0].current_hp = 0;
        assert_eq!(session.check_outcome(), BattleStatus::Victory);
        assert_eq!(session.phase, BattlePhase::Finished);
    }

    #[test]
    fn test_new_session_skips_empty_leading_wave() {
        let player = unit("hero", Faction::Player, None);
        let mut dead = unit("a", Faction::Monster, Some("w1"));
        dead.current_hp = 0;
        let enemies = vec![dead, unit("b", Faction::Monster, Some("w2"))];
        let session = BattleSession::new("s", "c", "n", player, enemies);
        assert_eq!(session.current_wave_index, 1);
        assert_eq!(session.current_wave_id(), Some("w2"));
    }

    #[test]
    fn test_session_json_round_trip() {
        let player = unit("hero", Faction::Player, None);
        let enemies = vec![unit("a", Faction::Monster, None)];
        let session = BattleSession::new("s", "c", "n", player, enemies);
        let json = serde_json::to_string(&session).unwrap();
        let back: BattleSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
