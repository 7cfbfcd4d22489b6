//! Integration tests: turn resolution, waves, statuses and listeners

mod common;

use battle_core::effect::replay_records;
use battle_core::event::{DamageKind, Trigger};
use battle_core::listener::ListenerScope;
use battle_core::prelude::*;
use battle_core::skill::{EffectNode, NodeTarget, SkillTargeting};
use common::*;

#[test]
fn test_wave_advances_before_next_wave_acts() {
    let fixture = Fixture::new().with_skill(skill(
        "sweep",
        SkillTargeting::AllEnemies,
        vec![damage_node("hit", Trigger::Cast, NodeTarget::CastTargets)],
    ));
    let mut hero = player(1000, 1000.0);
    hero.skills.push("sweep".to_string());
    let mut start = session(
        hero,
        vec![
            monster("a", "front", 50, 10.0),
            monster("b", "front", 50, 10.0),
            monster("c", "rear", 5000, 10.0),
        ],
    );
    start.queued_command = Some(PlayerCommand::CastSkill {
        skill_id: "sweep".to_string(),
        target_id: None,
    });

    let next = fixture.engine().resolve_turn_with_rng(&start, &mut rng(1));

    assert!(!next.enemies[0].is_alive());
    assert!(!next.enemies[1].is_alive());
    assert_eq!(next.current_wave_index, 1);
    assert_eq!(next.current_wave_id(), Some("rear"));
    assert!(next
        .events
        .iter()
        .any(|r| matches!(r.event, BattleEvent::WaveAdvanced { wave_index: 1, .. })));

    // Only the rear wave attacked: 10² / 11 = 9
    assert_eq!(hits(&next, "c", PLAYER, DamageKind::Attack), vec![9]);
    assert!(hits(&next, "a", PLAYER, DamageKind::Attack).is_empty());
    assert_eq!(next.player.current_hp, 991);
    assert_eq!(next.status, BattleStatus::Fighting);
    assert_eq!(next.phase, BattlePhase::PlayerInput);
    assert!(next.queued_command.is_none());
}

#[test]
fn test_dot_ticks_at_turn_start_then_expires() {
    let fixture = Fixture::new();
    let mut slime = monster("slime", "w1", 100, 0.0);
    slime.statuses.push(StatusInstance {
        id: "poison".to_string(),
        kind: StatusKind::Dot,
        source_id: Some(PLAYER.to_string()),
        element: Element::Poison,
        stacks: 1,
        remaining_turns: 1,
        magnitude: 20.0,
    });
    let start = session(player(100, 1.0), vec![slime]);
    let engine = fixture.engine();

    let after_one = engine.resolve_turn_with_rng(&start, &mut rng(2));
    assert_eq!(hits(&after_one, PLAYER, "slime", DamageKind::Status), vec![20]);
    // 20 from the tick, 1 from the player's minimum-damage hit
    assert_eq!(after_one.enemies[0].current_hp, 79);
    assert!(after_one.enemies[0].statuses.is_empty());

    let after_two = engine.resolve_turn_with_rng(&after_one, &mut rng(3));
    assert_eq!(hits(&after_two, PLAYER, "slime", DamageKind::Status), vec![20]);
    assert_eq!(after_two.enemies[0].current_hp, 78);
}

#[test]
fn test_terminal_session_is_returned_unchanged() {
    let fixture = Fixture::new();
    let mut done = session(player(100, 10.0), vec![monster("slime", "w1", 100, 10.0)]);
    done.enemies[0].current_hp = 0;
    done.check_outcome();
    assert_eq!(done.status, BattleStatus::Victory);

    let next = fixture.engine().resolve_turn_with_rng(&done, &mut rng(4));
    assert_eq!(next, done);
}

#[test]
fn test_caller_session_is_not_mutated() {
    let fixture = Fixture::new();
    let start = session(player(100, 10.0), vec![monster("slime", "w1", 100, 10.0)]);
    let snapshot = start.clone();
    let next = fixture.engine().resolve_turn_with_rng(&start, &mut rng(5));
    assert_eq!(start, snapshot);
    assert_eq!(next.turn, 1);
    assert!(next.next_event_seq > 0);
    assert_eq!(next.applied_event_seq, next.next_event_seq);
}

#[test]
fn test_replaying_events_is_idempotent() {
    let fixture = Fixture::new();
    let mut slime = monster("slime", "w1", 200, 5.0);
    slime.statuses.push(StatusInstance {
        id: "burn".to_string(),
        kind: StatusKind::Dot,
        source_id: Some(PLAYER.to_string()),
        element: Element::Fire,
        stacks: 2,
        remaining_turns: 3,
        magnitude: 4.0,
    });
    let start = session(player(100, 12.0), vec![slime]);
    let next = fixture.engine().resolve_turn_with_rng(&start, &mut rng(6));

    let mut replayed = start.clone();
    let applied = replay_records(&mut replayed, &next.events, &fixture.localizer);
    assert_eq!(applied, next.events.len());
    assert_eq!(replayed.player.current_hp, next.player.current_hp);
    assert_eq!(replayed.enemies[0].current_hp, next.enemies[0].current_hp);
    assert_eq!(replayed.enemies[0].statuses, next.enemies[0].statuses);

    let hp = replayed.enemies[0].current_hp;
    assert_eq!(replay_records(&mut replayed, &next.events, &fixture.localizer), 0);
    assert_eq!(replayed.enemies[0].current_hp, hp);
    assert_eq!(replayed.enemies[0].statuses, next.enemies[0].statuses);
}

#[test]
fn test_cast_listener_fires_once() {
    let fixture = Fixture::new().with_skill(skill(
        "double_tap",
        SkillTargeting::SingleEnemy,
        vec![
            damage_node("hit", Trigger::Cast, NodeTarget::CastTargets),
            damage_node("echo", Trigger::DamageApplied, NodeTarget::EventTarget),
        ],
    ));
    let mut hero = player(100, 10.0);
    hero.skills.push("double_tap".to_string());
    let mut start = session(hero, vec![monster("dummy", "w1", 10_000, 0.0)]);
    start.queued_command = Some(PlayerCommand::CastSkill {
        skill_id: "double_tap".to_string(),
        target_id: Some("dummy".to_string()),
    });
    let engine = fixture.engine();

    let turn_one = engine.resolve_turn_with_rng(&start, &mut rng(7));
    assert_eq!(hits(&turn_one, PLAYER, "dummy", DamageKind::Skill).len(), 2);
    assert!(turn_one.player.listeners.is_empty());

    let turn_two = engine.resolve_turn_with_rng(&turn_one, &mut rng(8));
    let skill_hits = hits(&turn_two, PLAYER, "dummy", DamageKind::Skill);
    assert_eq!(skill_hits.len(), 2, "no new skill hits on turn two");
    assert_eq!(hits(&turn_two, PLAYER, "dummy", DamageKind::Attack).len(), 1);
}

#[test]
fn test_unfired_cast_listener_survives_the_turn() {
    let fixture = Fixture::new().with_skill(skill(
        "vengeance",
        SkillTargeting::SingleEnemy,
        vec![damage_node("payback", Trigger::UnitDied, NodeTarget::CastTargets)],
    ));
    let mut hero = player(100, 1.0);
    hero.skills.push("vengeance".to_string());
    let mut start = session(hero, vec![monster("dummy", "w1", 10_000, 0.0)]);
    start.queued_command = Some(PlayerCommand::CastSkill {
        skill_id: "vengeance".to_string(),
        target_id: None,
    });

    let next = fixture.engine().resolve_turn_with_rng(&start, &mut rng(9));
    assert_eq!(next.player.listeners.len(), 1);
    assert_eq!(next.player.listeners[0].trigger, Trigger::UnitDied);
    assert!(next.player.listeners[0].once);
}

#[test]
fn test_unknown_skill_falls_back_to_attack() {
    let fixture = Fixture::new();
    let mut start = session(player(100, 10.0), vec![monster("dummy", "w1", 1000, 0.0)]);
    start.queued_command = Some(PlayerCommand::CastSkill {
        skill_id: "meteor".to_string(),
        target_id: None,
    });
    let next = fixture.engine().resolve_turn_with_rng(&start, &mut rng(10));
    // 10² / 11 = 9
    assert_eq!(hits(&next, PLAYER, "dummy", DamageKind::Attack), vec![9]);
}

#[test]
fn test_defeat_ends_the_battle() {
    let fixture = Fixture::new();
    let start = session(player(5, 1.0), vec![monster("ogre", "w1", 1000, 100.0)]);
    let next = fixture.engine().resolve_turn_with_rng(&start, &mut rng(11));
    assert_eq!(next.status, BattleStatus::Defeat);
    assert_eq!(next.phase, BattlePhase::Finished);
    assert_eq!(next.player.current_hp, 0);
    assert!(next
        .events
        .iter()
        .any(|r| matches!(&r.event, BattleEvent::UnitDied { unit_id, .. } if unit_id == PLAYER)));
}

#[test]
fn test_turn_cap_bounds_a_stalemate() {
    let fixture = Fixture::new();
    let start = session(player(1_000_000, 1.0), vec![monster("wall", "w1", 1_000_000, 1.0)]);
    let last = fixture.engine().run_until_finished(&start, 20, &mut rng(12));
    assert_eq!(last.status, BattleStatus::Fighting);
    assert_eq!(last.turn, 20);
}

#[test]
fn test_seeded_runs_are_deterministic() {
    let fixture = Fixture::new();
    let mut hero = player(120, 15.0);
    hero.derived.crit_rate = 0.5;
    hero.derived.crit_damage = 1.0;
    let start = session(hero, vec![monster("a", "w1", 80, 8.0), monster("b", "w2", 80, 8.0)]);
    let engine = fixture.engine();

    let first = engine.run_until_finished(&start, 100, &mut rng(13));
    let second = engine.run_until_finished(&start, 100, &mut rng(13));
    assert_eq!(first, second);
    assert!(first.status.is_terminal());
}

#[test]
fn test_dead_player_takes_no_further_hits() {
    let fixture = Fixture::new();
    let mut hero = player(10, 1.0);
    hero.derived.thorns_rate = 0.4;
    let first = monster("a", "w1", 1000, 100.0);
    let mut second = monster("b", "w1", 1000, 100.0);
    second.current_hp = 500;
    second.derived.lifesteal_rate = 1.0;
    let start = session(hero, vec![first, second]);

    let next = fixture.engine().resolve_turn_with_rng(&start, &mut rng(14));

    assert_eq!(next.status, BattleStatus::Defeat);
    assert_eq!(hits(&next, "a", PLAYER, DamageKind::Attack), vec![99]);
    // Thorns only reflect the 10 hp the player had left
    assert_eq!(hits(&next, PLAYER, "a", DamageKind::Reflect), vec![4]);
    assert!(hits(&next, "b", PLAYER, DamageKind::Attack).is_empty());
    assert!(hits(&next, PLAYER, "b", DamageKind::Reflect).is_empty());
    assert!(!next
        .events
        .iter()
        .any(|r| matches!(&r.event, BattleEvent::HealApplied { target_id, .. } if target_id == "b")));
    assert_eq!(next.enemies[1].current_hp, 500);
}

#[test]
fn test_enemy_casts_on_skill_cadence() {
    let fixture = Fixture::new().with_skill(skill(
        "slam",
        SkillTargeting::SingleEnemy,
        vec![damage_node("hit", Trigger::Cast, NodeTarget::CastTargets)],
    ));
    assert_eq!(fixture.constants.turn.enemy_skill_cadence, 3);
    let mut ogre = monster("ogre", "w1", 10_000, 10.0);
    ogre.skills.push("slam".to_string());
    let start = session(player(1000, 1.0), vec![ogre]);

    let last = fixture.engine().run_until_finished(&start, 3, &mut rng(15));

    assert_eq!(last.turn, 3);
    // Turns one and two attack, turn three casts
    assert_eq!(hits(&last, "ogre", PLAYER, DamageKind::Attack), vec![9, 9]);
    assert_eq!(hits(&last, "ogre", PLAYER, DamageKind::Skill), vec![9]);
    assert_eq!(last.player.current_hp, 1000 - 27);
}

#[test]
fn test_passive_fires_every_turn() {
    let fixture = Fixture::new().with_skill(skill(
        "retaliate",
        SkillTargeting::Caster,
        vec![EffectNode {
            scope: ListenerScope::Target,
            ..damage_node("riposte", Trigger::DamageApplied, NodeTarget::EventSource)
        }],
    ));
    let mut knight = monster("knight", "w1", 10_000, 10.0);
    knight.passives.push("retaliate".to_string());
    let start = session(player(1000, 10.0), vec![knight]);
    let engine = fixture.engine();

    let turn_one = engine.resolve_turn_with_rng(&start, &mut rng(16));
    assert_eq!(hits(&turn_one, "knight", PLAYER, DamageKind::Skill), vec![9]);
    // Passives are rebuilt each turn, never stored on the unit
    assert!(turn_one.enemies[0].listeners.is_empty());

    let turn_two = engine.resolve_turn_with_rng(&turn_one, &mut rng(17));
    assert_eq!(hits(&turn_two, "knight", PLAYER, DamageKind::Skill), vec![9, 9]);
    // Two riposte hits and two attacks
    assert_eq!(turn_two.player.current_hp, 1000 - 36);
}

#[test]
fn test_listener_chain_stops_at_max_depth() {
    let frenzy = skill(
        "frenzy",
        SkillTargeting::Caster,
        vec![damage_node("again", Trigger::DamageApplied, NodeTarget::EventTarget)],
    );
    let mut fixture = Fixture::new().with_skill(frenzy);
    let mut hero = player(1000, 10.0);
    hero.passives.push("frenzy".to_string());
    let start = session(hero, vec![monster("dummy", "w1", 10_000, 0.0)]);

    let next = fixture.engine().resolve_turn_with_rng(&start, &mut rng(18));
    assert_eq!(next.status, BattleStatus::Fighting);
    assert_eq!(hits(&next, PLAYER, "dummy", DamageKind::Attack), vec![9]);
    // One extra hit per dispatched round: rounds 0 to 3
    assert_eq!(hits(&next, PLAYER, "dummy", DamageKind::Skill), vec![9; 4]);
    assert_eq!(next.enemies[0].current_hp, 10_000 - 45);
    assert!(next.events.len() < 20);

    fixture.constants.turn.max_listener_depth = 1;
    let shallow = fixture.engine().resolve_turn_with_rng(&start, &mut rng(18));
    assert_eq!(hits(&shallow, PLAYER, "dummy", DamageKind::Skill), vec![9]);
}
