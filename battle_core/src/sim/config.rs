//! Simulation configuration

use serde::{Deserialize, Serialize};

/// Batch parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of independent runs
    pub runs: u32,
    /// Base seed; run `i` uses `seed + i`
    pub seed: u64,
    /// Turn cap per run; falls back to the game constants
    #[serde(default)]
    pub max_turns: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            runs: 100,
            seed: 42,
            max_turns: None,
        }
    }
}

impl SimConfig {
    pub fn new(runs: u32, seed: u64) -> Self {
        SimConfig {
            runs,
            seed,
            max_turns: None,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = Some(max_turns);
        self
    }
}
