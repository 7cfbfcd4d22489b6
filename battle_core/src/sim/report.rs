//! Batch reports

use super::runner::{RunResult, WaveSample};
use serde::{Deserialize, Serialize};

/// Aggregates for one wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveReport {
    pub wave_id: String,
    /// Completed runs that reached the wave
    pub reached: u32,
    /// Completed runs that cleared the wave
    pub survived: u32,
    pub avg_hp_percent: f64,
    pub min_hp_percent: f64,
    pub max_hp_percent: f64,
}

/// Aggregates for a whole batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub runs: u32,
    pub completed: u32,
    pub inconclusive: u32,
    pub wins: u32,
    /// Wins over completed runs
    pub win_rate: f64,
    pub avg_turns: f64,
    pub waves: Vec<WaveReport>,
}

impl BatchReport {
    pub fn from_runs(wave_order: &[String], results: &[RunResult]) -> Self {
        let completed: Vec<_> = results
            .iter()
            .filter_map(|r| match r {
                RunResult::Completed(summary) => Some(summary),
                RunResult::Inconclusive { .. } => None,
            })
            .collect();

        let wins = completed.iter().filter(|s| s.won).count() as u32;
        let completed_count = completed.len() as u32;
        let (win_rate, avg_turns) = if completed.is_empty() {
            (0.0, 0.0)
        } else {
            let turns: u32 = completed.iter().map(|s| s.turns).sum();
            (
                wins as f64 / completed.len() as f64,
                turns as f64 / completed.len() as f64,
            )
        };

        let waves = wave_order
            .iter()
            .enumerate()
            .map(|(index, wave_id)| {
                let samples: Vec<WaveSample> = completed
                    .iter()
                    .filter_map(|s| s.waves.get(index).copied().flatten())
                    .collect();
                let hp: Vec<f64> = samples.iter().map(|s| s.hp_percent()).collect();
                let (avg, min, max) = if hp.is_empty() {
                    (0.0, 0.0, 0.0)
                } else {
                    (
                        hp.iter().sum::<f64>() / hp.len() as f64,
                        hp.iter().copied().fold(f64::INFINITY, f64::min),
                        hp.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    )
                };
                WaveReport {
                    wave_id: wave_id.clone(),
                    reached: samples.len() as u32,
                    survived: samples
                        .iter()
                        .filter(|s| matches!(s, WaveSample::Cleared(_)))
                        .count() as u32,
                    avg_hp_percent: avg,
                    min_hp_percent: min,
                    max_hp_percent: max,
                }
            })
            .collect();

        BatchReport {
            runs: results.len() as u32,
            completed: completed_count,
            inconclusive: results.len() as u32 - completed_count,
            wins,
            win_rate,
            avg_turns,
            waves,
        }
    }
}
