//! Battle outcomes - rewards, drops, unlocks and history

use super::builder::SessionBuilder;
use super::ports::{Collaborators, DropContext};
use super::{node_key, BattleRecord, Equipment, MapProgress, PlayerState, SessionError};
use crate::battle::{BattleEngine, BattleSession};
use crate::locale::LogLine;
use crate::types::{BattleStatus, EnemyRank};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Where the node stands after a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Fighting,
    Victory,
    Defeat,
    Retreated,
}

/// Victory rewards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rewards {
    pub xp: u32,
    pub gold: u32,
    pub levels_gained: u32,
    pub drop: Option<Equipment>,
}

/// Result of resolving a player action against the active session
#[derive(Debug, Clone, PartialEq)]
pub struct NodeOutcome {
    pub player: PlayerState,
    pub progress: MapProgress,
    pub logs: Vec<String>,
    /// Node the map should focus next
    pub focus_node_id: Option<String>,
    pub status: NodeStatus,
    pub rewards: Option<Rewards>,
}

impl SessionBuilder<'_> {
    /// Resolve one turn of the player's active session
    ///
    /// A finished battle is settled: rewards and unlocks on victory, a failed
    /// history entry on defeat. The active session is cleared either way.
    pub fn resolve_player_attack(
        &self,
        player: &PlayerState,
        progress: &MapProgress,
        collaborators: &Collaborators<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<NodeOutcome, SessionError> {
        let session = player
            .active_session
            .as_ref()
            .ok_or(SessionError::NoActiveSession)?;

        let engine = BattleEngine::new(self.content, self.constants, self.localizer);
        let next_session = engine.resolve_turn_with_rng(session, rng);
        let logs = next_session
            .logs
            .get(session.logs.len()..)
            .unwrap_or(&[])
            .to_vec();

        match next_session.status {
            BattleStatus::Fighting => {
                let mut next = player.clone();
                next.active_session = Some(next_session);
                Ok(NodeOutcome {
                    player: next,
                    progress: progress.clone(),
                    logs,
                    focus_node_id: None,
                    status: NodeStatus::Fighting,
                    rewards: None,
                })
            }
            BattleStatus::Victory => self.settle_victory(player, progress, &next_session, logs, collaborators, rng),
            BattleStatus::Defeat => Ok(self.settle_failure(player, progress, &next_session, logs, false)),
        }
    }

    /// Abandon the active session; recorded as a failure, no rewards
    pub fn resolve_retreat(&self, player: &PlayerState, progress: &MapProgress) -> Result<NodeOutcome, SessionError> {
        let session = player
            .active_session
            .as_ref()
            .ok_or(SessionError::NoActiveSession)?;
        let logs = vec![self.localizer.format(&LogLine::Retreat)];
        Ok(self.settle_failure(player, progress, session, logs, true))
    }

    fn settle_victory(
        &self,
        player: &PlayerState,
        progress: &MapProgress,
        session: &BattleSession,
        mut logs: Vec<String>,
        collaborators: &Collaborators<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<NodeOutcome, SessionError> {
        let chapter = self
            .content
            .chapter(&session.chapter_id)
            .ok_or_else(|| SessionError::UnknownChapter(session.chapter_id.clone()))?;
        let node = chapter
            .node(&session.node_id)
            .ok_or_else(|| SessionError::UnknownNode {
                chapter_id: session.chapter_id.clone(),
                node_id: session.node_id.clone(),
            })?;

        let mut next = player.clone();

        // XP and gold
        let xp = node.xp + session.enemies.iter().map(|e| e.metadata.xp * node.level).sum::<u32>();
        let gold = node.gold + session.enemies.iter().map(|e| e.metadata.gold * node.level).sum::<u32>();
        next.xp += xp;
        next.gold += gold;
        logs.push(self.localizer.format(&LogLine::Rewards { xp, gold }));

        let mut levels_gained = 0;
        loop {
            let needed = self.constants.rewards.xp_to_next(next.level);
            if needed == 0 || next.xp < needed {
                break;
            }
            next.xp -= needed;
            next.level += 1;
            levels_gained += 1;
            logs.push(self.localizer.format(&LogLine::LevelUp { level: next.level }));
        }

        // Drop
        let context = DropContext {
            chapter_id: &session.chapter_id,
            node_id: &session.node_id,
            rank: session
                .enemies
                .iter()
                .map(|e| e.metadata.rank)
                .max()
                .unwrap_or(EnemyRank::Normal),
            monster_ids: session
                .enemies
                .iter()
                .filter_map(|e| e.metadata.monster_id.as_deref())
                .collect(),
            level: node.level,
        };
        let drop = collaborators.drops.generate(&context, &player.pity, rng);
        next.pity = drop.pity;
        match &drop.item {
            Some(item) => {
                logs.push(self.localizer.format(&LogLine::Drop {
                    item: &item.name,
                    rarity: item.rarity,
                }));
                next.inventory.push(item.clone());
            }
            None => logs.push(self.localizer.format(&LogLine::NoDrop)),
        }

        // Map
        let update = collaborators.map.apply_node_result(
            progress,
            self.content.chapters(),
            &session.chapter_id,
            &session.node_id,
            true,
        );
        for unlocked in &update.unlocked {
            logs.push(self.localizer.format(&LogLine::Unlocked {
                chapter: &unlocked.chapter_id,
                node: &unlocked.node_id,
            }));
        }
        let focus_node_id = update.unlocked.first().map(|n| n.node_id.clone());

        next.history.push(BattleRecord {
            session_id: session.id.clone(),
            chapter_id: session.chapter_id.clone(),
            node_id: session.node_id.clone(),
            won: true,
            retreated: false,
            turns: session.turn,
            xp,
            gold,
            drop: drop.item.clone(),
        });
        next.active_session = None;

        info!(session = %session.id, xp, gold, levels_gained, "victory settled");
        Ok(NodeOutcome {
            player: next,
            progress: update.progress,
            logs,
            focus_node_id,
            status: NodeStatus::Victory,
            rewards: Some(Rewards {
                xp,
                gold,
                levels_gained,
                drop: drop.item,
            }),
        })
    }

    fn settle_failure(
        &self,
        player: &PlayerState,
        progress: &MapProgress,
        session: &BattleSession,
        logs: Vec<String>,
        retreated: bool,
    ) -> NodeOutcome {
        let mut next = player.clone();
        *next
            .failures
            .entry(node_key(&session.chapter_id, &session.node_id))
            .or_insert(0) += 1;
        next.history.push(BattleRecord {
            session_id: session.id.clone(),
            chapter_id: session.chapter_id.clone(),
            node_id: session.node_id.clone(),
            won: false,
            retreated,
            turns: session.turn,
            xp: 0,
            gold: 0,
            drop: None,
        });
        next.active_session = None;

        debug!(session = %session.id, retreated, "failure recorded");
        NodeOutcome {
            player: next,
            progress: progress.clone(),
            logs,
            focus_node_id: Some(session.node_id.clone()),
            status: if retreated {
                NodeStatus::Retreated
            } else {
                NodeStatus::Defeat
            },
            rewards: None,
        }
    }
}
