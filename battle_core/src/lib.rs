//! battle_core - Turn-based combat engine
//!
//! This library provides:
//! - Combat math and stat finalization (soft caps, level/encounter scaling)
//! - Combat units, statuses and declarative skills
//! - An event-driven turn loop with a single state writer
//! - Session assembly from map content, rewards and map progress
//! - Batch simulation for balance statistics

pub mod action;
pub mod battle;
pub mod config;
pub mod content;
pub mod context;
pub mod damage;
pub mod effect;
pub mod event;
pub mod formula;
pub mod listener;
pub mod locale;
pub mod prelude;
pub mod session;
pub mod sim;
pub mod skill;
pub mod stats;
pub mod status;
pub mod types;
pub mod unit;

// Re-export core types for convenience
pub use battle::{BattleEngine, BattleSession, PlayerCommand};
pub use config::{default_content, load_constants, load_content, ConfigError, GameConstants};
pub use content::{ContentCatalog, ContentLibrary};
pub use event::{BattleEvent, EventBus, EventRecord};
pub use locale::{EnglishLocalizer, Localizer};
pub use session::{MapProgress, PlayerState, SessionBuilder, SessionError};
pub use sim::{BatchReport, BatchSimulator, SimConfig};
pub use types::{BattlePhase, BattleStatus, Element, EnemyRank, Faction, Rarity, StatusKind};
pub use unit::CombatUnit;
