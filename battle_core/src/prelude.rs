//! Prelude module for convenient imports
//!
//! ```rust
//! use battle_core::prelude::*;
//! ```

// Core types
pub use crate::types::{BattlePhase, BattleStatus, Element, EnemyRank, Faction, Rarity, StatusKind};
pub use crate::unit::{CombatUnit, UnitFactory, UnitSchema};
pub use crate::status::StatusInstance;

// Engine
pub use crate::battle::{BattleEngine, BattleSession, PlayerCommand};
pub use crate::event::{BattleEvent, EventBus, EventRecord};

// Content and config
pub use crate::config::{default_content, GameConstants};
pub use crate::content::{ContentCatalog, ContentLibrary};
pub use crate::locale::{EnglishLocalizer, Localizer};

// Sessions
pub use crate::session::{
    Collaborators, LinearMapProgress, MapProgress, PlayerState, SessionBuilder, WeightedDropTable,
};

// Simulation
pub use crate::sim::{BatchReport, BatchSimulator, SimConfig};
