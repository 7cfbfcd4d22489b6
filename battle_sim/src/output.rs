//! Plain-text rendering

use battle_core::prelude::*;
use std::fmt::Write;

/// Render a batch report as a table
pub fn report_text(chapter: &str, node: &str, report: &BatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Batch report: {chapter} / {node}");
    let _ = writeln!(
        out,
        "  Runs: {}  Completed: {}  Inconclusive: {}",
        report.runs, report.completed, report.inconclusive
    );
    let _ = writeln!(
        out,
        "  Win rate: {:.1}%  Avg turns: {:.1}",
        report.win_rate * 100.0,
        report.avg_turns
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {:<12} {:>8} {:>9} {:>8} {:>8} {:>8}",
        "Wave", "Reached", "Survived", "Avg HP%", "Min HP%", "Max HP%"
    );
    for wave in &report.waves {
        let _ = writeln!(
            out,
            "  {:<12} {:>8} {:>9} {:>8.1} {:>8.1} {:>8.1}",
            wave.wave_id,
            wave.reached,
            wave.survived,
            wave.avg_hp_percent,
            wave.min_hp_percent,
            wave.max_hp_percent
        );
    }
    out
}

/// Render a finished session's log and outcome
pub fn session_text(session: &BattleSession) -> String {
    let mut out = String::new();
    for line in &session.logs {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out);
    let outcome = match session.status {
        BattleStatus::Victory => "victory",
        BattleStatus::Defeat => "defeat",
        BattleStatus::Fighting => "unfinished (turn cap reached)",
    };
    let _ = writeln!(
        out,
        "Outcome: {outcome} after {} turns, player hp {}/{}",
        session.turn, session.player.current_hp, session.player.base.hp
    );
    out
}
