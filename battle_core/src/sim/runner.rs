//! Simulation runner

use super::config::SimConfig;
use super::report::BatchReport;
use crate::battle::{BattleEngine, BattleSession};
use crate::config::GameConstants;
use crate::content::ContentCatalog;
use crate::locale::Localizer;
use crate::session::{PlayerState, SessionBuilder, SessionError};
use crate::types::BattleStatus;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// How one wave went for the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveSample {
    /// Wave cleared with this hp percentage left
    Cleared(f64),
    /// Player fell during this wave
    Fell,
}

impl WaveSample {
    pub fn hp_percent(self) -> f64 {
        match self {
            WaveSample::Cleared(hp) => hp,
            WaveSample::Fell => 0.0,
        }
    }
}

/// A run that finished within the turn cap
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub won: bool,
    pub turns: u32,
    /// Per wave; `None` when the wave was never reached
    pub waves: Vec<Option<WaveSample>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunResult {
    Completed(RunSummary),
    /// Hit the turn cap while still fighting; excluded from aggregates
    Inconclusive { turns: u32 },
}

/// Play one session to completion
pub fn run_single(
    engine: &BattleEngine<'_>,
    session: &BattleSession,
    max_turns: u32,
    rng: &mut dyn RngCore,
) -> RunResult {
    let mut current = session.clone();
    let mut waves: Vec<Option<WaveSample>> = vec![None; current.wave_order.len()];

    while current.status == BattleStatus::Fighting {
        if current.turn >= max_turns {
            debug!(session = %current.id, turns = current.turn, "run inconclusive");
            return RunResult::Inconclusive { turns: current.turn };
        }
        current = engine.resolve_turn_with_rng(&current, rng);

        let hp = current.player.hp_percent();
        for (index, sample) in waves.iter_mut().enumerate() {
            if sample.is_none() && current.wave_cleared(index) {
                *sample = Some(WaveSample::Cleared(hp));
            }
        }
    }

    if current.status == BattleStatus::Defeat {
        if let Some(sample) = waves.get_mut(current.current_wave_index) {
            if sample.is_none() {
                *sample = Some(WaveSample::Fell);
            }
        }
    }

    RunResult::Completed(RunSummary {
        won: current.status == BattleStatus::Victory,
        turns: current.turn,
        waves,
    })
}

/// Runs batches of sessions for one node
pub struct BatchSimulator<'a> {
    content: &'a dyn ContentCatalog,
    constants: &'a GameConstants,
    localizer: &'a dyn Localizer,
}

impl<'a> BatchSimulator<'a> {
    pub fn new(
        content: &'a dyn ContentCatalog,
        constants: &'a GameConstants,
        localizer: &'a dyn Localizer,
    ) -> Self {
        BatchSimulator {
            content,
            constants,
            localizer,
        }
    }

    /// Run `config.runs` independent sessions of a node
    ///
    /// Fails only if the node cannot be built.
    pub fn run(
        &self,
        player: &PlayerState,
        chapter_id: &str,
        node_id: &str,
        config: &SimConfig,
    ) -> Result<BatchReport, SessionError> {
        let builder = SessionBuilder::new(self.content, self.constants, self.localizer);
        let template = builder.build_session(player, chapter_id, node_id, format!("{chapter_id}:{node_id}:sim"))?;
        let engine = BattleEngine::new(self.content, self.constants, self.localizer);
        let max_turns = config.max_turns.unwrap_or(self.constants.turn.max_turns);

        let results: Vec<RunResult> = (0..config.runs)
            .map(|run| {
                let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(run as u64));
                run_single(&engine, &template, max_turns, &mut rng)
            })
            .collect();

        let report = BatchReport::from_runs(&template.wave_order, &results);
        info!(
            chapter = chapter_id,
            node = node_id,
            runs = report.runs,
            win_rate = report.win_rate,
            inconclusive = report.inconclusive,
            "batch complete"
        );
        Ok(report)
    }
}
