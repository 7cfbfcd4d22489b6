//! Log line formatting
//!
//! The engine describes what happened as a [`LogLine`]; a [`Localizer`] turns
//! it into text. Formatting never feeds back into battle state.

use crate::types::Rarity;

/// Something worth telling the player
#[derive(Debug, Clone, PartialEq)]
pub enum LogLine<'a> {
    SessionStarted { chapter: &'a str, node: &'a str, waves: usize },
    Attack { source: &'a str, target: &'a str, amount: u32, crit: bool },
    Cast { source: &'a str, skill: &'a str },
    Reaction { reaction: &'a str, target: &'a str, bonus: u32 },
    Defeated { name: &'a str },
    WaveAdvanced { wave: usize, total: usize },
    Victory,
    Defeat,
    Retreat,
    Rewards { xp: u32, gold: u32 },
    LevelUp { level: u32 },
    Drop { item: &'a str, rarity: Rarity },
    NoDrop,
    Unlocked { chapter: &'a str, node: &'a str },
}

pub trait Localizer {
    fn format(&self, line: &LogLine<'_>) -> String;
}

/// Default English strings
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLocalizer;

impl Localizer for EnglishLocalizer {
    fn format(&self, line: &LogLine<'_>) -> String {
        match line {
            LogLine::SessionStarted { chapter, node, waves } => {
                format!("Entering {chapter} / {node} ({waves} waves).")
            }
            LogLine::Attack { source, target, amount, crit } => {
                if *crit {
                    format!("{source} critically hits {target} for {amount}!")
                } else {
                    format!("{source} hits {target} for {amount}.")
                }
            }
            LogLine::Cast { source, skill } => format!("{source} casts {skill}."),
            LogLine::Reaction { reaction, target, bonus } => {
                format!("{reaction} on {target} for {bonus} bonus damage!")
            }
            LogLine::Defeated { name } => format!("{name} defeated."),
            LogLine::WaveAdvanced { wave, total } => format!("Wave {wave}/{total} approaches."),
            LogLine::Victory => "Victory!".to_string(),
            LogLine::Defeat => "You have fallen.".to_string(),
            LogLine::Retreat => "You retreat from battle.".to_string(),
            LogLine::Rewards { xp, gold } => format!("Gained {xp} XP and {gold} gold."),
            LogLine::LevelUp { level } => format!("Level up! Now level {level}."),
            LogLine::Drop { item, rarity } => format!("Found {item} ({}).", rarity.as_str()),
            LogLine::NoDrop => "No loot this time.".to_string(),
            LogLine::Unlocked { chapter, node } => format!("Unlocked {chapter} / {node}."),
        }
    }
}
