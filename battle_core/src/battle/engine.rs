//! BattleEngine - the external facade over the turn loop

use super::turn::resolve_turn;
use super::BattleSession;
use crate::config::GameConstants;
use crate::content::ContentCatalog;
use crate::context::ResolveContext;
use crate::event::EventBus;
use crate::locale::Localizer;
use rand::RngCore;

/// Resolves turns against a fixed set of collaborators
#[derive(Clone, Copy)]
pub struct BattleEngine<'a> {
    content: &'a dyn ContentCatalog,
    constants: &'a GameConstants,
    localizer: &'a dyn Localizer,
}

impl<'a> BattleEngine<'a> {
    pub fn new(
        content: &'a dyn ContentCatalog,
        constants: &'a GameConstants,
        localizer: &'a dyn Localizer,
    ) -> Self {
        BattleEngine {
            content,
            constants,
            localizer,
        }
    }

    pub fn constants(&self) -> &GameConstants {
        self.constants
    }

    /// Resolve one turn using the thread RNG
    pub fn resolve_turn(&self, session: &BattleSession) -> BattleSession {
        let mut rng = rand::thread_rng();
        self.resolve_turn_with_rng(session, &mut rng)
    }

    /// Resolve one turn with a provided RNG (for deterministic runs)
    pub fn resolve_turn_with_rng(&self, session: &BattleSession, rng: &mut dyn RngCore) -> BattleSession {
        let mut bus = EventBus::starting_at(session.next_event_seq, session.turn);
        let mut ctx = ResolveContext::new(self.content, self.constants, self.localizer, rng);
        resolve_turn(session, &mut ctx, &mut bus)
    }

    /// Resolve turns until the battle ends or `max_turns` is reached
    ///
    /// Returns the last session state; its status is still `Fighting` when
    /// the cap was hit.
    pub fn run_until_finished(
        &self,
        session: &BattleSession,
        max_turns: u32,
        rng: &mut dyn RngCore,
    ) -> BattleSession {
        let mut current = session.clone();
        while !current.status.is_terminal() && current.turn < max_turns {
            current = self.resolve_turn_with_rng(&current, rng);
        }
        current
    }
}
