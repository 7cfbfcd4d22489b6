//! Collaborator interfaces consumed on battle resolution

use super::{Equipment, MapProgress, NodeRef, PityState};
use crate::content::Chapter;
use crate::types::EnemyRank;
use rand::RngCore;

/// What was defeated, for drop generation
#[derive(Debug, Clone, PartialEq)]
pub struct DropContext<'a> {
    pub chapter_id: &'a str,
    pub node_id: &'a str,
    /// Highest rank among defeated enemies
    pub rank: EnemyRank,
    pub monster_ids: Vec<&'a str>,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropResult {
    pub item: Option<Equipment>,
    pub pity: PityState,
}

/// Equipment drop generation (victory only)
pub trait DropGenerator {
    fn generate(&self, context: &DropContext<'_>, pity: &PityState, rng: &mut dyn RngCore) -> DropResult;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub progress: MapProgress,
    /// Nodes unlocked by this result, in unlock order
    pub unlocked: Vec<NodeRef>,
}

/// Map progression rules
pub trait MapProgressService {
    fn apply_node_result(
        &self,
        progress: &MapProgress,
        chapters: &[Chapter],
        chapter_id: &str,
        node_id: &str,
        won: bool,
    ) -> ProgressUpdate;
}

/// Collaborators used when a battle finishes
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub drops: &'a dyn DropGenerator,
    pub map: &'a dyn MapProgressService,
}
