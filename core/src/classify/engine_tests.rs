//! Tests for ClassificationEngine
//!
//! Verifies that:
//! - Raise precedence follows cast count and liveness
//! - AlreadyRaised is sticky until the target goes down again
//! - Dispel states follow cast count and watched status
//! - Caster names come out in first-observed order

use chrono::{NaiveDate, NaiveDateTime};

use crate::casts::{CastCategory, CastEvent, CastEventHandler, CastKey, EndReason};
use crate::context::{intern, resolve_all};
use crate::identity::{ActorId, IdentityResolver};
use crate::observer::{CharacterIdentity, GroupKind};

use super::{ActorObservation, ClassificationEngine, DispelState, RaiseState};

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn at(ms: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::Duration::milliseconds(ms)
}

struct Party {
    x: ActorId,
    y: ActorId,
    z: ActorId,
    w: ActorId,
}

fn party() -> Party {
    let mut resolver = IdentityResolver::new(100);
    let entries: Vec<_> = ["X", "Y", "Z", "W"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            (
                i as u32 + 1,
                Some(CharacterIdentity {
                    token: i as u64 + 100,
                    name: name.to_string(),
                }),
            )
        })
        .collect();
    let tick = resolver.resolve_tick(&entries);
    Party {
        x: tick.get(1).unwrap(),
        y: tick.get(2).unwrap(),
        z: tick.get(3).unwrap(),
        w: tick.get(4).unwrap(),
    }
}

fn key(caster: ActorId, target: ActorId, category: CastCategory) -> CastKey {
    CastKey {
        caster,
        target,
        category,
    }
}

fn started(key: CastKey, caster: &str, seq: u64, started_at: NaiveDateTime) -> CastEvent {
    CastEvent::Started {
        key,
        caster_name: intern(caster),
        seq,
        started_at,
        elapsed: 0.0,
        total: 8.0,
        restarted: false,
    }
}

fn ended(key: CastKey) -> CastEvent {
    CastEvent::Ended {
        key,
        reason: EndReason::Disappeared,
    }
}

fn obs(actor: ActorId, incapacitated: bool, has_status: bool) -> ActorObservation {
    ActorObservation {
        actor,
        name: intern("target"),
        group: GroupKind::Party,
        incapacitated,
        has_status,
    }
}

fn raise_of(engine: &ClassificationEngine, actor: ActorId) -> RaiseState {
    engine.classification(actor).unwrap().raise
}

fn dispel_of(engine: &ClassificationEngine, actor: ActorId) -> DispelState {
    engine.classification(actor).unwrap().dispel
}

// ═══════════════════════════════════════════════════════════════════════════
// Raise
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_dead_and_never_targeted_is_none() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    engine.classify(&[obs(p.y, true, false)], at(0));
    assert_eq!(raise_of(&engine, p.y), RaiseState::None);
    assert!(!engine.classification(p.y).unwrap().is_highlighted());
}

#[test]
fn test_scenario_a_single_raise_then_revive() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    let xy = key(p.x, p.y, CastCategory::Raise);

    engine.handle_event(&started(xy, "X", 0, at(0)));
    engine.classify(&[obs(p.y, true, false)], at(0));
    let c = engine.classification(p.y).unwrap();
    assert_eq!(c.raise, RaiseState::BeingRaised);
    assert_eq!(resolve_all(&c.raise_casters), vec!["X"]);
    assert_eq!(c.raise_progress, Some(0.0));

    engine.handle_event(&CastEvent::Progressed {
        key: xy,
        elapsed: 8.0,
        total: 8.0,
    });
    engine.classify(&[obs(p.y, true, false)], at(8000));
    assert_eq!(engine.classification(p.y).unwrap().raise_progress, Some(1.0));

    engine.handle_event(&ended(xy));
    engine.classify(&[obs(p.y, false, false)], at(8100));
    let c = engine.classification(p.y).unwrap();
    assert_eq!(c.raise, RaiseState::AlreadyRaised);
    assert!(c.raise_casters.is_empty());
    assert_eq!(c.raise_progress, None);
}

#[test]
fn test_revive_lagging_behind_cast_end() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    let xy = key(p.x, p.y, CastCategory::Raise);

    engine.handle_event(&started(xy, "X", 0, at(0)));
    engine.classify(&[obs(p.y, true, false)], at(0));
    engine.handle_event(&ended(xy));

    // Cast gone, target still shown as down for a tick
    engine.classify(&[obs(p.y, true, false)], at(100));
    assert_eq!(raise_of(&engine, p.y), RaiseState::None);

    engine.classify(&[obs(p.y, false, false)], at(200));
    assert_eq!(raise_of(&engine, p.y), RaiseState::AlreadyRaised);
}

#[test]
fn test_revive_while_cast_still_reported_is_already_raised() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    let xy = key(p.x, p.y, CastCategory::Raise);

    engine.handle_event(&started(xy, "X", 0, at(0)));
    engine.classify(&[obs(p.y, true, false)], at(0));
    engine.classify(&[obs(p.y, false, false)], at(8000));
    assert_eq!(raise_of(&engine, p.y), RaiseState::AlreadyRaised);
}

#[test]
fn test_scenario_b_competing_raises() {
    let p = party();
    let mut engine = ClassificationEngine::new();

    engine.handle_events(&[
        started(key(p.x, p.y, CastCategory::Raise), "X", 0, at(0)),
        started(key(p.z, p.y, CastCategory::Raise), "Z", 1, at(0)),
    ]);
    engine.classify(&[obs(p.y, true, false)], at(0));
    let c = engine.classification(p.y).unwrap();
    assert_eq!(c.raise, RaiseState::RedundantRaise);
    assert_eq!(resolve_all(&c.raise_casters), vec!["X", "Z"]);
}

#[test]
fn test_two_raises_are_redundant_regardless_of_elapsed() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    let xy = key(p.x, p.y, CastCategory::Raise);
    let zy = key(p.z, p.y, CastCategory::Raise);

    engine.handle_events(&[started(xy, "X", 0, at(0)), started(zy, "Z", 1, at(7000))]);
    engine.handle_event(&CastEvent::Progressed {
        key: xy,
        elapsed: 7.9,
        total: 8.0,
    });
    engine.classify(&[obs(p.y, true, false)], at(7900));
    assert_eq!(raise_of(&engine, p.y), RaiseState::RedundantRaise);
}

#[test]
fn test_caster_order_follows_arrival_not_event_order() {
    let p = party();
    let mut engine = ClassificationEngine::new();

    // Events arrive out of sequence order
    engine.handle_events(&[
        started(key(p.z, p.y, CastCategory::Raise), "Z", 5, at(0)),
        started(key(p.x, p.y, CastCategory::Raise), "X", 2, at(0)),
    ]);
    engine.classify(&[obs(p.y, true, false)], at(0));
    assert_eq!(
        engine.classification(p.y).unwrap().raise_caster_text(),
        "X, Z"
    );
}

#[test]
fn test_raise_on_living_target_is_redundant() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    engine.handle_event(&started(key(p.x, p.y, CastCategory::Raise), "X", 0, at(0)));
    engine.classify(&[obs(p.y, false, false)], at(0));
    assert_eq!(raise_of(&engine, p.y), RaiseState::RedundantRaise);
}

#[test]
fn test_new_raise_after_revive_is_redundant() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    let xy = key(p.x, p.y, CastCategory::Raise);
    let zy = key(p.z, p.y, CastCategory::Raise);

    engine.handle_event(&started(xy, "X", 0, at(0)));
    engine.classify(&[obs(p.y, true, false)], at(0));
    engine.handle_event(&ended(xy));
    engine.classify(&[obs(p.y, false, false)], at(8000));
    assert_eq!(raise_of(&engine, p.y), RaiseState::AlreadyRaised);

    // Z starts raising after Y is already up
    engine.handle_event(&started(zy, "Z", 1, at(9000)));
    engine.classify(&[obs(p.y, false, false)], at(9000));
    let c = engine.classification(p.y).unwrap();
    assert_eq!(c.raise, RaiseState::RedundantRaise);
    assert_eq!(resolve_all(&c.raise_casters), vec!["Z"]);
}

#[test]
fn test_already_raised_resets_on_death() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    let xy = key(p.x, p.y, CastCategory::Raise);

    engine.handle_event(&started(xy, "X", 0, at(0)));
    engine.classify(&[obs(p.y, true, false)], at(0));
    engine.handle_event(&ended(xy));
    engine.classify(&[obs(p.y, false, false)], at(8000));

    // Stays AlreadyRaised while alive
    engine.classify(&[obs(p.y, false, false)], at(60_000));
    assert_eq!(raise_of(&engine, p.y), RaiseState::AlreadyRaised);

    engine.classify(&[obs(p.y, true, false)], at(61_000));
    assert_eq!(raise_of(&engine, p.y), RaiseState::None);

    // Revived by something untracked: no raise history this time
    engine.classify(&[obs(p.y, false, false)], at(62_000));
    assert_eq!(raise_of(&engine, p.y), RaiseState::None);
}

#[test]
fn test_wasted_raise_after_untracked_revive_leaves_no_history() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    let xy = key(p.x, p.y, CastCategory::Raise);

    engine.classify(&[obs(p.y, true, false)], at(0));
    engine.classify(&[obs(p.y, false, false)], at(1000));
    assert_eq!(raise_of(&engine, p.y), RaiseState::None);

    engine.handle_event(&started(xy, "X", 0, at(2000)));
    engine.classify(&[obs(p.y, false, false)], at(2000));
    assert_eq!(raise_of(&engine, p.y), RaiseState::RedundantRaise);

    engine.handle_event(&ended(xy));
    engine.classify(&[obs(p.y, false, false)], at(3000));
    assert_eq!(raise_of(&engine, p.y), RaiseState::None);

    engine.classify(&[obs(p.y, false, false)], at(63_000));
    assert_eq!(raise_of(&engine, p.y), RaiseState::None);
}

#[test]
fn test_interrupted_raise_on_dead_target() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    let xy = key(p.x, p.y, CastCategory::Raise);

    engine.handle_event(&started(xy, "X", 0, at(0)));
    engine.classify(&[obs(p.y, true, false)], at(0));
    engine.handle_event(&ended(xy));
    engine.classify(&[obs(p.y, true, false)], at(3000));
    assert_eq!(raise_of(&engine, p.y), RaiseState::None);

    // A later raise from someone else completes
    let zy = key(p.z, p.y, CastCategory::Raise);
    engine.handle_event(&started(zy, "Z", 1, at(4000)));
    engine.classify(&[obs(p.y, true, false)], at(4000));
    assert_eq!(raise_of(&engine, p.y), RaiseState::BeingRaised);
    engine.handle_event(&ended(zy));
    engine.classify(&[obs(p.y, false, false)], at(12_000));
    assert_eq!(raise_of(&engine, p.y), RaiseState::AlreadyRaised);
}

// ═══════════════════════════════════════════════════════════════════════════
// Dispel
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_scenario_c_dispellable_then_being_dispelled() {
    let p = party();
    let mut engine = ClassificationEngine::new();

    engine.classify(&[obs(p.w, false, true)], at(0));
    assert_eq!(dispel_of(&engine, p.w), DispelState::Dispellable);
    assert!(engine.classification(p.w).unwrap().dispel_casters.is_empty());

    engine.handle_event(&started(key(p.x, p.w, CastCategory::Dispel), "X", 0, at(100)));
    engine.classify(&[obs(p.w, false, true)], at(100));
    let c = engine.classification(p.w).unwrap();
    assert_eq!(c.dispel, DispelState::BeingDispelled);
    assert_eq!(resolve_all(&c.dispel_casters), vec!["X"]);
}

#[test]
fn test_scenario_d_dispel_without_status_is_redundant() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    engine.handle_event(&started(key(p.x, p.w, CastCategory::Dispel), "X", 0, at(0)));
    engine.classify(&[obs(p.w, false, false)], at(0));
    let c = engine.classification(p.w).unwrap();
    assert_eq!(c.dispel, DispelState::RedundantDispel);
    assert_eq!(resolve_all(&c.dispel_casters), vec!["X"]);
}

#[test]
fn test_two_dispels_with_status_are_redundant() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    engine.handle_events(&[
        started(key(p.x, p.w, CastCategory::Dispel), "X", 0, at(0)),
        started(key(p.z, p.w, CastCategory::Dispel), "Z", 1, at(0)),
    ]);
    engine.classify(&[obs(p.w, false, true)], at(0));
    assert_eq!(dispel_of(&engine, p.w), DispelState::RedundantDispel);
}

#[test]
fn test_raise_and_dispel_are_independent() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    engine.handle_events(&[
        started(key(p.x, p.y, CastCategory::Raise), "X", 0, at(0)),
        started(key(p.z, p.y, CastCategory::Dispel), "Z", 1, at(0)),
    ]);
    engine.classify(&[obs(p.y, true, true)], at(0));
    let c = engine.classification(p.y).unwrap();
    assert_eq!(c.raise, RaiseState::BeingRaised);
    assert_eq!(c.dispel, DispelState::BeingDispelled);
    assert_eq!(resolve_all(&c.raise_casters), vec!["X"]);
    assert_eq!(resolve_all(&c.dispel_casters), vec!["Z"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Table Maintenance
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_identical_input_gives_identical_table() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    engine.handle_event(&started(key(p.x, p.y, CastCategory::Raise), "X", 0, at(0)));
    let input = [obs(p.y, true, false), obs(p.w, false, true), obs(p.x, false, false)];

    engine.classify(&input, at(0));
    let first: Vec<_> = engine.classifications().cloned().collect();
    engine.classify(&input, at(0));
    let second: Vec<_> = engine.classifications().cloned().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_table_only_holds_current_observations() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    engine.classify(&[obs(p.y, false, true), obs(p.w, false, true)], at(0));
    engine.classify(&[obs(p.w, false, true)], at(100));
    assert!(engine.classification(p.y).is_none());
    assert_eq!(engine.classifications().count(), 1);
}

#[test]
fn test_forget_drops_casts_by_and_on_actor() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    engine.handle_events(&[
        started(key(p.x, p.y, CastCategory::Raise), "X", 0, at(0)),
        started(key(p.z, p.y, CastCategory::Raise), "Z", 1, at(0)),
        started(key(p.x, p.w, CastCategory::Dispel), "X", 2, at(0)),
    ]);

    engine.forget(p.x);
    engine.classify(&[obs(p.y, true, false), obs(p.w, false, false)], at(100));
    let c = engine.classification(p.y).unwrap();
    assert_eq!(c.raise, RaiseState::BeingRaised);
    assert_eq!(resolve_all(&c.raise_casters), vec!["Z"]);
    assert_eq!(dispel_of(&engine, p.w), DispelState::None);
    assert_eq!(engine.casts_on(p.w).count(), 0);
}

#[test]
fn test_restart_replaces_existing_entry() {
    let p = party();
    let mut engine = ClassificationEngine::new();
    let xy = key(p.x, p.y, CastCategory::Raise);
    engine.handle_event(&started(xy, "X", 0, at(0)));
    engine.handle_event(&started(xy, "X", 1, at(500)));
    assert_eq!(engine.casts_on(p.y).count(), 1);

    engine.classify(&[obs(p.y, true, false)], at(500));
    assert_eq!(raise_of(&engine, p.y), RaiseState::BeingRaised);
}
