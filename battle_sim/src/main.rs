//! battle_sim - Balance simulator and session replayer for battle_core
//!
//! Usage:
//!   battle_sim batch --chapter greenwood --node glade --level 3 --runs 500
//!   battle_sim replay --chapter training --node duel --seed 7
//!
//! Set `RUST_LOG=battle_core=debug` to trace turn resolution.

mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Batch, Replay};

/// Balance tools for the battle engine
#[derive(Parser)]
#[command(name = "battle_sim")]
#[command(about = "Batch simulation and replays for battle_core", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run many independent sessions of a node and report statistics
    Batch(Batch),

    /// Play one session to completion and print its log
    Replay(Replay),
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Batch(cmd) => cmd.execute(),
        Command::Replay(cmd) => cmd.execute(),
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default: warnings only)
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
