//! Batch simulation - many independent sessions for balance statistics
//!
//! Each run gets its own RNG seeded from `seed + run_index`, so a batch is
//! reproducible and runs share no mutable state.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{BatchReport, WaveReport};
pub use runner::{run_single, BatchSimulator, RunResult, RunSummary, WaveSample};
