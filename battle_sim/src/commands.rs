//! Subcommands

use crate::output;
use anyhow::{anyhow, Context, Result};
use battle_core::config::{default_content, load_constants, load_content};
use battle_core::prelude::*;
use clap::{Args, Parser};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::info;

/// Where the player fights and with what content
#[derive(Args, Debug)]
pub struct Encounter {
    /// Chapter id
    #[arg(long)]
    chapter: String,

    /// Node id within the chapter
    #[arg(long)]
    node: String,

    /// Player level
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Player preset id from the content file
    #[arg(long, default_value = "adventurer")]
    preset: String,

    /// Content TOML (defaults to the embedded content)
    #[arg(long)]
    content: Option<PathBuf>,

    /// Game constants TOML (defaults to built-in constants)
    #[arg(long)]
    constants: Option<PathBuf>,
}

impl Encounter {
    fn load(&self) -> Result<(ContentLibrary, GameConstants)> {
        let content = match &self.content {
            Some(path) => load_content(path)
                .with_context(|| format!("loading content from {}", path.display()))?,
            None => default_content(),
        };
        let constants = match &self.constants {
            Some(path) => load_constants(path)
                .with_context(|| format!("loading constants from {}", path.display()))?,
            None => GameConstants::default(),
        };
        Ok((content, constants))
    }

    fn player(&self, content: &ContentLibrary) -> Result<PlayerState> {
        let preset = content
            .preset(&self.preset)
            .ok_or_else(|| anyhow!("unknown preset '{}'", self.preset))?;
        Ok(PlayerState::from_preset(preset, self.level))
    }
}

/// Run many independent sessions of a node
#[derive(Parser, Debug)]
pub struct Batch {
    #[command(flatten)]
    encounter: Encounter,

    /// Number of runs
    #[arg(short = 'n', long, default_value_t = 1000)]
    runs: u32,

    /// Base seed; run i uses seed + i
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Override the per-run turn cap
    #[arg(long)]
    max_turns: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Batch {
    pub fn execute(self) -> Result<()> {
        let (content, constants) = self.encounter.load()?;
        let player = self.encounter.player(&content)?;
        let localizer = EnglishLocalizer;

        let mut config = SimConfig::new(self.runs, self.seed);
        if let Some(max_turns) = self.max_turns {
            config = config.with_max_turns(max_turns);
        }

        info!(runs = config.runs, seed = config.seed, "starting batch");
        let simulator = BatchSimulator::new(&content, &constants, &localizer);
        let report = simulator.run(&player, &self.encounter.chapter, &self.encounter.node, &config)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!(
                "{}",
                output::report_text(&self.encounter.chapter, &self.encounter.node, &report)
            );
        }
        Ok(())
    }
}

/// Play one session to completion
#[derive(Parser, Debug)]
pub struct Replay {
    #[command(flatten)]
    encounter: Encounter,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Also print every event record as JSON lines
    #[arg(long)]
    events: bool,
}

impl Replay {
    pub fn execute(self) -> Result<()> {
        let (content, constants) = self.encounter.load()?;
        let player = self.encounter.player(&content)?;
        let localizer = EnglishLocalizer;

        let builder = SessionBuilder::new(&content, &constants, &localizer);
        let start = builder.start_session(&player, &self.encounter.chapter, &self.encounter.node)?;

        let engine = BattleEngine::new(&content, &constants, &localizer);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let finished = engine.run_until_finished(&start.session, constants.turn.max_turns, &mut rng);

        print!("{}", output::session_text(&finished));
        if self.events {
            for record in &finished.events {
                println!("{}", serde_json::to_string(record)?);
            }
        }
        Ok(())
    }
}
