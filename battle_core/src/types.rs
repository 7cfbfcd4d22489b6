//! Core enumerations shared across the combat engine

use serde::{Deserialize, Serialize};

/// Which side of the battle a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Player,
    Monster,
}

/// Elemental affinity of a unit, hit or status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Physical,
    Fire,
    Ice,
    Lightning,
    Poison,
}

impl Element {
    /// Elemental hits benefit from penetration and elemental bonus
    pub fn is_elemental(self) -> bool {
        !matches!(self, Element::Physical)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Element::Physical => "physical",
            Element::Fire => "fire",
            Element::Ice => "ice",
            Element::Lightning => "lightning",
            Element::Poison => "poison",
        }
    }
}

/// Monster rank, drives stat multipliers and drop bonuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyRank {
    #[default]
    Normal,
    Elite,
    Boss,
}

/// Kind of a status instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Damage over time
    Dot,
    /// Heal over time
    Hot,
    /// Outgoing damage increase
    Buff,
    /// Incoming damage increase
    Debuff,
    /// Flat absorb per incoming hit
    Shield,
}

/// Turn phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    PlayerInput,
    Resolving,
    EnemyTurn,
    Finished,
}

/// Outcome status of a session; terminal once not `Fighting`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleStatus {
    Fighting,
    Victory,
    Defeat,
}

impl BattleStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, BattleStatus::Fighting)
    }
}

/// Equipment rarity, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_serialization() {
        let json = serde_json::to_string(&Element::Lightning).unwrap();
        assert_eq!(json, "\"lightning\"");
    }

    #[test]
    fn test_rank_ordering() {
        assert!(EnemyRank::Boss > EnemyRank::Elite);
        assert!(EnemyRank::Elite > EnemyRank::Normal);
    }

    #[test]
    fn test_terminal_status() {
        assert!(!BattleStatus::Fighting.is_terminal());
        assert!(BattleStatus::Victory.is_terminal());
        assert!(BattleStatus::Defeat.is_terminal());
    }
}
