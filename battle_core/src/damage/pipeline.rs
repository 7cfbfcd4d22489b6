//! DamagePipeline - compute one damage instance and emit its events
//!
//! The pipeline never mutates units. It reads the session, emits
//! `DamageApplied`/`HealApplied` events and leaves hp changes (and death) to
//! the effect resolver.
//!
//! Steps:
//! 1. Roll crit from the source's crit rate
//! 2. Effective defense (penetration for elemental hits only)
//! 3. Base damage via the combat formula
//! 4. Damage variance roll
//! 5. Ordered modifiers
//! 6. `final = max(1, floor(damage))`
//! 7. Element reaction bonus
//! 8. Source lifesteal on the damage dealt, capped at missing hp
//! 9. Target thorns on the damage dealt, reflected back to the source

use super::modifier::{standard_chain, DamageModifier, ModifierContext};
use crate::battle::BattleSession;
use crate::context::ResolveContext;
use crate::event::{BattleEvent, DamageKind, EventBus, HealKind};
use crate::formula::constants::MIN_DAMAGE;
use crate::formula::{calculate_damage, crit_multiplier, effective_defense, effective_lifesteal};
use crate::status::maybe_emit_reaction;
use crate::types::Element;
use rand::Rng;
use tracing::trace;

/// Input of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct DamageRequest {
    pub source_id: String,
    pub target_id: String,
    pub element: Element,
    pub kind: DamageKind,
    /// Multiplier on the source's attack
    pub scale: f64,
    /// Flat damage added before defense
    pub flat: f64,
    pub modifiers: Vec<DamageModifier>,
}

impl DamageRequest {
    /// Request with the standard modifier chain
    pub fn new(source_id: &str, target_id: &str, element: Element, kind: DamageKind) -> Self {
        DamageRequest {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            element,
            kind,
            scale: 1.0,
            flat: 0.0,
            modifiers: standard_chain(),
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_flat(mut self, flat: f64) -> Self {
        self.flat = flat;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Vec<DamageModifier>) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// What the pipeline emitted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageOutcome {
    pub amount: u32,
    pub is_crit: bool,
    pub reaction_bonus: u32,
    pub healed: u32,
    pub reflected: u32,
}

/// Run the pipeline for one hit
///
/// Returns `None` (and emits nothing) when the source or target is missing or
/// dead. Liveness counts hits already queued on `bus` but not yet applied.
pub fn resolve_damage(
    session: &BattleSession,
    request: &DamageRequest,
    ctx: &mut ResolveContext<'_>,
    bus: &mut EventBus,
) -> Option<DamageOutcome> {
    let source = session.unit(&request.source_id)?;
    let target = session.unit(&request.target_id)?;
    let source_hp = bus.projected_hp(&source.id, source.current_hp, source.base.hp);
    let target_hp = bus.projected_hp(&target.id, target.current_hp, target.base.hp);
    if source_hp == 0 || target_hp == 0 {
        trace!(source = %source.id, target = %target.id, "source or target down, no hit");
        return None;
    }
    let constants = &ctx.constants.pipeline;

    // Step 1: Crit roll
    let is_crit = ctx.rng.gen::<f64>() < source.derived.crit_rate;
    let crit_mult = crit_multiplier(is_crit, source.derived.crit_damage);

    // Step 2: Defense after penetration
    let penetration = if request.element.is_elemental() {
        source.derived.penetration
    } else {
        0.0
    };
    let defense = effective_defense(target.base.defense, penetration);

    // Step 3: Base damage
    let attack = source.base.attack * request.scale;
    let mut damage = calculate_damage(attack, defense, crit_mult, request.flat);

    // Step 4: Variance
    let variance = constants.damage_variance;
    if variance > 0.0 {
        damage *= ctx.rng.gen_range((1.0 - variance)..=(1.0 + variance));
    }

    // Step 5: Modifiers
    let modifier_ctx = ModifierContext {
        source,
        target,
        element: request.element,
        reduction_cap: constants.reduction_cap,
    };
    for modifier in &request.modifiers {
        damage = modifier.apply(damage, &modifier_ctx);
    }

    // Step 6: Final amount
    let amount = damage.floor().max(MIN_DAMAGE) as u32;
    trace!(
        source = %source.id,
        target = %target.id,
        amount,
        is_crit,
        element = request.element.as_str(),
        "damage"
    );
    bus.emit(BattleEvent::DamageApplied {
        source_id: source.id.clone(),
        target_id: target.id.clone(),
        amount,
        element: request.element,
        kind: request.kind,
        is_crit,
    });

    let mut outcome = DamageOutcome {
        amount,
        is_crit,
        ..Default::default()
    };

    // Step 7: Element reaction
    if let Some(bonus) = maybe_emit_reaction(source, target, request.element, constants.reaction_fraction, bus) {
        outcome.reaction_bonus = bonus;
    }

    // Overkill does not feed lifesteal or thorns
    let dealt = amount.min(target_hp);

    // Step 8: Lifesteal
    let rate = effective_lifesteal(source.derived.lifesteal_rate);
    let heal = ((dealt as f64) * rate).floor() as u32;
    let heal = heal.min(source.base.hp.saturating_sub(source_hp));
    if heal > 0 {
        bus.emit(BattleEvent::HealApplied {
            source_id: source.id.clone(),
            target_id: source.id.clone(),
            amount: heal,
            kind: HealKind::Lifesteal,
        });
        outcome.healed = heal;
    }

    // Step 9: Thorns
    let thorns = target.derived.thorns_rate.clamp(0.0, constants.thorns_cap);
    let reflected = ((dealt as f64) * thorns).floor() as u32;
    if reflected > 0 {
        bus.emit(BattleEvent::DamageApplied {
            source_id: target.id.clone(),
            target_id: source.id.clone(),
            amount: reflected,
            element: Element::Physical,
            kind: DamageKind::Reflect,
            is_crit: false,
        });
        outcome.reflected = reflected;
    }

    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConstants;
    use crate::content::ContentLibrary;
    use crate::locale::EnglishLocalizer;
    use crate::types::Faction;
    use crate::unit::{BaseStats, CombatUnit, DerivedStats, UnitMetadata};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn unit(id: &str, faction: Faction, hp: u32, attack: f64) -> CombatUnit {
        CombatUnit {
            id: id.to_string(),
            name: id.to_string(),
            faction,
            level: 1,
            base: BaseStats {
                hp,
                attack,
                defense: 0.0,
            },
            current_hp: hp,
            derived: DerivedStats::default(),
            skills: Vec::new(),
            passives: Vec::new(),
            elements: Vec::new(),
            statuses: Vec::new(),
            listeners: Vec::new(),
            metadata: UnitMetadata::default(),
        }
    }

    fn session(player: CombatUnit, enemy: CombatUnit) -> BattleSession {
        BattleSession::new("s", "c", "n", player, vec![enemy])
    }

    fn run(session: &BattleSession, request: &DamageRequest) -> (Option<DamageOutcome>, Vec<BattleEvent>) {
        let content = ContentLibrary::default();
        let mut constants = GameConstants::default();
        constants.pipeline.damage_variance = 0.0;
        let localizer = EnglishLocalizer;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ctx = ResolveContext::new(&content, &constants, &localizer, &mut rng);
        let mut bus = EventBus::new();
        let outcome = resolve_damage(session, request, &mut ctx, &mut bus);
        let events = bus.drain().into_iter().map(|r| r.event).collect();
        (outcome, events)
    }

    #[test]
    fn test_plain_hit() {
        let s = session(
            unit("player", Faction::Player, 100, 100.0),
            unit("slime", Faction::Monster, 500, 1.0),
        );
        let request = DamageRequest::new("player", "slime", Element::Physical, DamageKind::Attack);
        let (outcome, events) = run(&s, &request);

        let outcome = outcome.unwrap();
        assert_eq!(outcome.amount, 99);
        assert!(!outcome.is_crit);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            BattleEvent::DamageApplied { amount: 99, kind: DamageKind::Attack, .. }
        ));
        // The pipeline only emits
        assert_eq!(s.enemies[0].current_hp, 500);
    }

    #[test]
    fn test_lifesteal_capped_at_missing_hp() {
        let mut player = unit("player", Faction::Player, 100, 100.0);
        player.current_hp = 90;
        player.derived.lifesteal_rate = 1.0;
        let s = session(player, unit("slime", Faction::Monster, 500, 1.0));
        let request = DamageRequest::new("player", "slime", Element::Physical, DamageKind::Attack);
        let (outcome, events) = run(&s, &request);

        assert_eq!(outcome.unwrap().healed, 10);
        assert!(events.iter().any(|e| matches!(
            e,
            BattleEvent::HealApplied { amount: 10, kind: HealKind::Lifesteal, .. }
        )));
    }

    #[test]
    fn test_thorns_clamped_and_reflected() {
        let mut slime = unit("slime", Faction::Monster, 500, 1.0);
        slime.derived.thorns_rate = 0.9;
        let s = session(unit("player", Faction::Player, 100, 100.0), slime);
        let request = DamageRequest::new("player", "slime", Element::Physical, DamageKind::Attack);
        let (outcome, events) = run(&s, &request);

        // floor(99 * 0.4)
        assert_eq!(outcome.unwrap().reflected, 39);
        match events.last() {
            Some(BattleEvent::DamageApplied {
                source_id,
                target_id,
                amount,
                kind,
                ..
            }) => {
                assert_eq!(source_id, "slime");
                assert_eq!(target_id, "player");
                assert_eq!(*amount, 39);
                assert_eq!(*kind, DamageKind::Reflect);
            }
            other => panic!("expected reflect, got {other:?}"),
        }
    }

    #[test]
    fn test_scale_and_flat() {
        let s = session(
            unit("player", Faction::Player, 100, 50.0),
            unit("slime", Faction::Monster, 500, 1.0),
        );
        let request = DamageRequest::new("player", "slime", Element::Physical, DamageKind::Skill)
            .with_scale(2.0)
            .with_flat(0.0)
            .with_modifiers(Vec::new());
        let (outcome, _) = run(&s, &request);
        assert_eq!(outcome.unwrap().amount, 99);
    }

    #[test]
    fn test_overkill_clamps_lifesteal_and_thorns() {
        let mut player = unit("player", Faction::Player, 100, 100.0);
        player.current_hp = 10;
        player.derived.lifesteal_rate = 1.0;
        let mut slime = unit("slime", Faction::Monster, 500, 1.0);
        slime.current_hp = 20;
        slime.derived.thorns_rate = 0.4;
        let s = session(player, slime);
        let request = DamageRequest::new("player", "slime", Element::Physical, DamageKind::Attack);
        let (outcome, _) = run(&s, &request);

        let outcome = outcome.unwrap();
        assert_eq!(outcome.amount, 99);
        // Only 20 hp was left to take: floor(20 * 0.5), floor(20 * 0.4)
        assert_eq!(outcome.healed, 10);
        assert_eq!(outcome.reflected, 8);
    }

    #[test]
    fn test_target_downed_by_a_queued_hit_is_skipped() {
        let s = session(
            unit("player", Faction::Player, 100, 100.0),
            unit("slime", Faction::Monster, 50, 1.0),
        );
        let content = ContentLibrary::default();
        let mut constants = GameConstants::default();
        constants.pipeline.damage_variance = 0.0;
        let localizer = EnglishLocalizer;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ctx = ResolveContext::new(&content, &constants, &localizer, &mut rng);
        let mut bus = EventBus::new();

        let request = DamageRequest::new("player", "slime", Element::Physical, DamageKind::Attack);
        assert!(resolve_damage(&s, &request, &mut ctx, &mut bus).is_some());
        assert!(resolve_damage(&s, &request, &mut ctx, &mut bus).is_none());
        assert_eq!(bus.drain().len(), 1);
    }

    #[test]
    fn test_dead_target_emits_nothing() {
        let mut slime = unit("slime", Faction::Monster, 500, 1.0);
        slime.current_hp = 0;
        let s = session(unit("player", Faction::Player, 100, 100.0), slime);
        let request = DamageRequest::new("player", "slime", Element::Physical, DamageKind::Attack);
        let (outcome, events) = run(&s, &request);
        assert!(outcome.is_none());
        assert!(events.is_empty());
    }
}
