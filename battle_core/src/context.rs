//! Resolution context - read-only collaborators plus the RNG for one turn

use crate::config::GameConstants;
use crate::content::ContentCatalog;
use crate::locale::Localizer;
use rand::RngCore;

/// Borrowed collaborators threaded through action/effect resolution
pub struct ResolveContext<'a> {
    pub content: &'a dyn ContentCatalog,
    pub constants: &'a GameConstants,
    pub localizer: &'a dyn Localizer,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        content: &'a dyn ContentCatalog,
        constants: &'a GameConstants,
        localizer: &'a dyn Localizer,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        ResolveContext {
            content,
            constants,
            localizer,
            rng,
        }
    }
}
