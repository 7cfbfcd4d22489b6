//! Default collaborator implementations

use super::ports::{DropContext, DropGenerator, DropResult, MapProgressService, ProgressUpdate};
use super::{node_key, Equipment, MapProgress, NodeRef, PityState};
use crate::content::{Chapter, DropTableConfig};
use crate::types::{EnemyRank, Rarity};
use rand::{Rng, RngCore};
use tracing::debug;

/// Weighted rarity table with pity counters
///
/// Every drop roll increments every counter, including a roll that misses
/// `drop_chance` and yields no item, so dry streaks also build pity. A
/// rarity roll then resets the rolled rarity. A rarity whose counter reaches
/// its pity threshold is forced (highest rarity first). Elite and boss kills
/// add weight to rare-or-better rarities.
#[derive(Debug, Clone)]
pub struct WeightedDropTable {
    config: DropTableConfig,
}

impl WeightedDropTable {
    pub fn new(config: DropTableConfig) -> Self {
        WeightedDropTable { config }
    }

    fn weight(&self, rarity: Rarity, base: f64, rank: EnemyRank) -> f64 {
        if rarity < Rarity::Rare {
            return base;
        }
        let bonus = match rank {
            EnemyRank::Normal => 0.0,
            EnemyRank::Elite => self.config.elite_bonus,
            EnemyRank::Boss => self.config.boss_bonus,
        };
        base * (1.0 + bonus)
    }

    /// Pick a rarity, updating pity counters
    pub fn roll_rarity(&self, rank: EnemyRank, pity: &mut PityState, rng: &mut dyn RngCore) -> Option<Rarity> {
        if self.config.rarities.is_empty() {
            return None;
        }
        pity.increment_all();

        let forced = self
            .config
            .rarities
            .iter()
            .filter(|entry| entry.pity.map_or(false, |threshold| pity.get(entry.rarity) >= threshold))
            .map(|entry| entry.rarity)
            .max();

        let rarity = match forced {
            Some(rarity) => {
                debug!(rarity = rarity.as_str(), "pity forced");
                rarity
            }
            None => {
                let weights: Vec<(Rarity, f64)> = self
                    .config
                    .rarities
                    .iter()
                    .map(|entry| (entry.rarity, self.weight(entry.rarity, entry.weight.max(0.0), rank)))
                    .collect();
                let total: f64 = weights.iter().map(|(_, w)| w).sum();
                if total <= 0.0 {
                    return None;
                }
                let mut roll = rng.gen::<f64>() * total;
                let mut chosen = weights[weights.len() - 1].0;
                for (rarity, weight) in &weights {
                    if roll < *weight {
                        chosen = *rarity;
                        break;
                    }
                    roll -= weight;
                }
                chosen
            }
        };

        pity.reset(rarity);
        Some(rarity)
    }
}

impl DropGenerator for WeightedDropTable {
    fn generate(&self, context: &DropContext<'_>, pity: &PityState, rng: &mut dyn RngCore) -> DropResult {
        let mut pity = pity.clone();
        if rng.gen::<f64>() >= self.config.drop_chance {
            pity.increment_all();
            debug!("no drop");
            return DropResult { item: None, pity };
        }

        let item = self.roll_rarity(context.rank, &mut pity, rng).map(|rarity| {
            let tier = Rarity::all().iter().position(|r| *r == rarity).unwrap_or(0) as u32;
            Equipment {
                id: format!(
                    "{}:{}:{}:{}",
                    context.chapter_id,
                    context.node_id,
                    rarity.as_str(),
                    rng.next_u32()
                ),
                name: format!("{} Relic", title_case(rarity.as_str())),
                rarity,
                level: context.level,
                power: context.level.max(1) * (tier + 1) * 5,
            }
        });

        DropResult { item, pity }
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Linear unlocks: next node in the chapter, then the next chapter's first node
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearMapProgress;

impl MapProgressService for LinearMapProgress {
    fn apply_node_result(
        &self,
        progress: &MapProgress,
        chapters: &[Chapter],
        chapter_id: &str,
        node_id: &str,
        won: bool,
    ) -> ProgressUpdate {
        let mut next = progress.clone();
        let mut unlocked = Vec::new();

        if won {
            next.cleared_nodes.insert(node_key(chapter_id, node_id));

            let position = chapters.iter().enumerate().find_map(|(ci, chapter)| {
                (chapter.id == chapter_id)
                    .then(|| chapter.nodes.iter().position(|n| n.id == node_id).map(|ni| (ci, ni)))
                    .flatten()
            });

            if let Some((ci, ni)) = position {
                let candidate = match chapters[ci].nodes.get(ni + 1) {
                    Some(node) => Some((&chapters[ci], node)),
                    None => chapters
                        .get(ci + 1)
                        .and_then(|chapter| chapter.nodes.first().map(|node| (chapter, node))),
                };
                if let Some((chapter, node)) = candidate {
                    next.unlocked_chapters.insert(chapter.id.clone());
                    if next.unlocked_nodes.insert(node_key(&chapter.id, &node.id)) {
                        unlocked.push(NodeRef {
                            chapter_id: chapter.id.clone(),
                            node_id: node.id.clone(),
                        });
                    }
                }
            }
        }

        ProgressUpdate {
            progress: next,
            unlocked,
        }
    }
}
