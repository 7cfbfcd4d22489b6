//! SessionBuilder - assemble battle sessions from map content

use super::{PlayerState, SessionError};
use crate::battle::BattleSession;
use crate::config::GameConstants;
use crate::content::ContentCatalog;
use crate::locale::{LogLine, Localizer};
use crate::stats::{Scaling, StatFinalizer};
use crate::types::EnemyRank;
use crate::unit::UnitFactory;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Id of the player unit in every session
pub const PLAYER_UNIT_ID: &str = "player";

/// A freshly started session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStart {
    /// Player state with the session set as active
    pub player: PlayerState,
    pub session: BattleSession,
    pub logs: Vec<String>,
}

/// Builds sessions and resolves their outcomes
pub struct SessionBuilder<'a> {
    pub(super) content: &'a dyn ContentCatalog,
    pub(super) constants: &'a GameConstants,
    pub(super) localizer: &'a dyn Localizer,
}

impl<'a> SessionBuilder<'a> {
    pub fn new(
        content: &'a dyn ContentCatalog,
        constants: &'a GameConstants,
        localizer: &'a dyn Localizer,
    ) -> Self {
        SessionBuilder {
            content,
            constants,
            localizer,
        }
    }

    /// Assemble a session for a map node without touching player state
    ///
    /// Enemies are finalized at the node level and encounter factor, tagged
    /// with their wave, and bosses with a counter goal are adjusted against
    /// the player's final stats.
    pub fn build_session(
        &self,
        player: &PlayerState,
        chapter_id: &str,
        node_id: &str,
        session_id: impl Into<String>,
    ) -> Result<BattleSession, SessionError> {
        let chapter = self
            .content
            .chapter(chapter_id)
            .ok_or_else(|| rejected(SessionError::UnknownChapter(chapter_id.to_string())))?;
        let node = chapter.node(node_id).ok_or_else(|| {
            rejected(SessionError::UnknownNode {
                chapter_id: chapter_id.to_string(),
                node_id: node_id.to_string(),
            })
        })?;
        if node.waves.is_empty() {
            return Err(rejected(SessionError::NoWaves {
                chapter_id: chapter_id.to_string(),
                node_id: node_id.to_string(),
            }));
        }
        if node.waves.iter().all(|w| w.monsters.iter().all(|m| m.count == 0)) {
            return Err(rejected(SessionError::EmptyEncounter {
                chapter_id: chapter_id.to_string(),
                node_id: node_id.to_string(),
            }));
        }

        let factory = UnitFactory::new(self.constants);
        let player_unit = factory.build(PLAYER_UNIT_ID, &player.schema(), Scaling::level(player.level));
        let player_stats =
            StatFinalizer::new(&self.constants.finalizer).finalize(&player.stats, Scaling::level(player.level));

        let scaling = Scaling {
            level: node.level,
            encounter_factor: node.encounter_factor,
        };
        let mut enemies = Vec::new();
        let mut spawned: HashMap<&str, u32> = HashMap::new();

        for (index, wave) in node.waves.iter().enumerate() {
            let wave_id = wave
                .id
                .clone()
                .unwrap_or_else(|| format!("wave-{}", index + 1));

            for entry in &wave.monsters {
                let template = self
                    .content
                    .monster(&entry.monster_id)
                    .ok_or_else(|| rejected(SessionError::UnknownMonster(entry.monster_id.clone())))?;

                for _ in 0..entry.count {
                    let n = spawned.entry(template.id.as_str()).or_insert(0);
                    *n += 1;
                    let mut unit = factory.build(format!("{}-{}", template.id, n), &template.schema(), scaling);
                    unit.metadata.wave_id = Some(wave_id.clone());
                    unit.metadata.monster_id = Some(template.id.clone());
                    unit.metadata.xp = template.xp;
                    unit.metadata.gold = template.gold;

                    if template.rank == EnemyRank::Boss {
                        if let Some(goal) = &template.counter_goal {
                            let outcome = goal.evaluate(&player_stats);
                            unit.scale_offense(outcome.boss_multiplier(&self.constants.counter_goal));
                            debug!(boss = %unit.id, ?outcome, "counter goal");
                        }
                    }
                    enemies.push(unit);
                }
            }
        }

        let session = BattleSession::new(session_id, chapter_id, node_id, player_unit, enemies);
        debug!(
            session = %session.id,
            waves = session.wave_order.len(),
            enemies = session.enemies.len(),
            "session built"
        );
        Ok(session)
    }

    /// Start a session for the player
    ///
    /// On error nothing changes; the player keeps its previous state.
    pub fn start_session(
        &self,
        player: &PlayerState,
        chapter_id: &str,
        node_id: &str,
    ) -> Result<SessionStart, SessionError> {
        if let Some(active) = &player.active_session {
            return Err(rejected(SessionError::SessionInProgress(active.id.clone())));
        }

        let number = player.sessions_started + 1;
        let session_id = format!("{chapter_id}:{node_id}:{number}");
        let mut session = self.build_session(player, chapter_id, node_id, session_id)?;

        let line = self.localizer.format(&LogLine::SessionStarted {
            chapter: chapter_id,
            node: node_id,
            waves: session.wave_order.len(),
        });
        session.logs.push(line.clone());

        let mut next = player.clone();
        next.sessions_started = number;
        next.active_session = Some(session.clone());

        Ok(SessionStart {
            player: next,
            session,
            logs: vec![line],
        })
    }
}

fn rejected(err: SessionError) -> SessionError {
    warn!(%err, "session rejected");
    err
}
