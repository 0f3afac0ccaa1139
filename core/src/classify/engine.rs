//! Classification engine
//!
//! Follows cast lifecycles through `CastEventHandler` to keep an index of
//! live casts per target, then classifies every observed actor once per
//! tick.
//!
//! Raise precedence:
//!
//! | raise casts | incapacitated | result                                   |
//! |-------------|---------------|------------------------------------------|
//! | 0           | no            | `AlreadyRaised` if targeted then revived |
//! | 0           | any           | `None` otherwise                         |
//! | 1           | yes           | `BeingRaised`                            |
//! | 1           | no            | `AlreadyRaised` if the cast began before the revive was seen, else `RedundantRaise` |
//! | 2+          | any           | `RedundantRaise`                         |

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use hashbrown::HashMap;

use crate::casts::{CastCategory, CastEvent, CastEventHandler, CastKey};
use crate::context::IStr;
use crate::identity::ActorId;
use crate::observer::GroupKind;

use super::{DispelState, RaiseState, TargetClassification};

/// Per-actor input to one classification pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorObservation {
    pub actor: ActorId,
    pub name: IStr,
    pub group: GroupKind,
    pub incapacitated: bool,
    pub has_status: bool,
}

/// A live cast as seen from its target
#[derive(Debug, Clone, Copy)]
struct TrackedCast {
    key: CastKey,
    caster_name: IStr,
    seq: u64,
    started_at: NaiveDateTime,
    elapsed: f32,
    total: f32,
}

impl TrackedCast {
    fn progress(&self) -> f32 {
        if self.total > 0.0 {
            (self.elapsed / self.total).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Liveness history behind `AlreadyRaised`
#[derive(Debug, Clone, Copy, Default)]
struct RaiseMemory {
    /// Targeted by a raise while incapacitated, since last going down
    was_target: bool,
    /// When the actor was last seen going from incapacitated to alive
    revived_at: Option<NaiveDateTime>,
    /// Liveness at the previous observation
    last_incapacitated: Option<bool>,
}

impl RaiseMemory {
    fn observe(&mut self, incapacitated: bool, now: NaiveDateTime) {
        match (self.last_incapacitated, incapacitated) {
            // Went down (again): previous raise history no longer applies
            (Some(false) | None, true) => {
                self.was_target = false;
                self.revived_at = None;
            }
            (Some(true), false) => self.revived_at = Some(now),
            _ => {}
        }
        self.last_incapacitated = Some(incapacitated);
    }
}

#[derive(Debug, Default)]
pub struct ClassificationEngine {
    /// Live casts keyed by target, kept in arrival order
    casts: HashMap<ActorId, Vec<TrackedCast>>,
    memory: HashMap<ActorId, RaiseMemory>,
    table: BTreeMap<ActorId, TargetClassification>,
}

impl ClassificationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the classification table from this tick's observations.
    pub fn classify(&mut self, observations: &[ActorObservation], now: NaiveDateTime) {
        self.table.clear();

        for obs in observations {
            if self.table.contains_key(&obs.actor) {
                continue;
            }
            let classification = self.classify_one(obs, now);
            self.table.insert(obs.actor, classification);
        }

        tracing::trace!(
            tracked = self.table.len(),
            highlighted = self.table.values().filter(|c| c.is_highlighted()).count(),
            "Classified targets"
        );
    }

    fn classify_one(&mut self, obs: &ActorObservation, now: NaiveDateTime) -> TargetClassification {
        let casts = self.casts.get(&obs.actor).map(Vec::as_slice).unwrap_or(&[]);
        let raises: Vec<&TrackedCast> = casts
            .iter()
            .filter(|c| c.key.category == CastCategory::Raise)
            .collect();
        let dispels: Vec<&TrackedCast> = casts
            .iter()
            .filter(|c| c.key.category == CastCategory::Dispel)
            .collect();

        let memory = self.memory.entry(obs.actor).or_default();
        memory.observe(obs.incapacitated, now);
        // Only a raise aimed at the actor while down counts toward AlreadyRaised
        if raises.iter().any(|c| {
            obs.incapacitated || memory.revived_at.is_some_and(|revived| c.started_at <= revived)
        }) {
            memory.was_target = true;
        }

        let raise = match (raises.as_slice(), obs.incapacitated) {
            ([], false) if memory.was_target && memory.revived_at.is_some() => {
                RaiseState::AlreadyRaised
            }
            ([], _) => RaiseState::None,
            ([_], true) => RaiseState::BeingRaised,
            ([cast], false) => {
                if memory.revived_at.is_some_and(|revived| cast.started_at <= revived) {
                    RaiseState::AlreadyRaised
                } else {
                    RaiseState::RedundantRaise
                }
            }
            _ => RaiseState::RedundantRaise,
        };

        let dispel = match (dispels.len(), obs.has_status) {
            (0, false) => DispelState::None,
            (0, true) => DispelState::Dispellable,
            (1, true) => DispelState::BeingDispelled,
            _ => DispelState::RedundantDispel,
        };

        let names = |casts: &[&TrackedCast]| -> Vec<IStr> {
            casts.iter().map(|c| c.caster_name).collect()
        };

        TargetClassification {
            actor: obs.actor,
            name: obs.name,
            group: obs.group,
            incapacitated: obs.incapacitated,
            raise,
            dispel,
            raise_casters: if raise.shows_casters() {
                names(&raises)
            } else {
                Vec::new()
            },
            dispel_casters: if dispel.shows_casters() {
                names(&dispels)
            } else {
                Vec::new()
            },
            has_status: obs.has_status,
            raise_progress: raises.iter().map(|c| c.progress()).reduce(f32::max),
        }
    }

    pub fn classification(&self, actor: ActorId) -> Option<&TargetClassification> {
        self.table.get(&actor)
    }

    /// All actors classified on the last tick, in `ActorId` order
    pub fn classifications(&self) -> impl Iterator<Item = &TargetClassification> {
        self.table.values()
    }

    /// Live casts targeting `actor`, in arrival order (debug views)
    pub fn casts_on(&self, actor: ActorId) -> impl Iterator<Item = (CastCategory, IStr, f32)> + '_ {
        self.casts
            .get(&actor)
            .into_iter()
            .flatten()
            .map(|c| (c.key.category, c.caster_name, c.elapsed))
    }

    /// Drop all state about an evicted actor
    pub fn forget(&mut self, actor: ActorId) {
        self.memory.remove(&actor);
        self.table.remove(&actor);
        self.casts.remove(&actor);
        for casts in self.casts.values_mut() {
            casts.retain(|c| c.key.caster != actor);
        }
        self.casts.retain(|_, casts| !casts.is_empty());
    }

    pub fn clear(&mut self) {
        self.casts.clear();
        self.memory.clear();
        self.table.clear();
    }
}

impl CastEventHandler for ClassificationEngine {
    fn handle_event(&mut self, event: &CastEvent) {
        match event {
            CastEvent::Started {
                key,
                caster_name,
                seq,
                started_at,
                elapsed,
                total,
                ..
            } => {
                let casts = self.casts.entry(key.target).or_default();
                casts.retain(|c| c.key != *key);
                casts.push(TrackedCast {
                    key: *key,
                    caster_name: *caster_name,
                    seq: *seq,
                    started_at: *started_at,
                    elapsed: *elapsed,
                    total: *total,
                });
                casts.sort_by_key(|c| c.seq);
            }
            CastEvent::Progressed {
                key,
                elapsed,
                total,
            } => {
                if let Some(cast) = self
                    .casts
                    .get_mut(&key.target)
                    .and_then(|casts| casts.iter_mut().find(|c| c.key == *key))
                {
                    cast.elapsed = *elapsed;
                    cast.total = *total;
                }
            }
            CastEvent::Ended { key, .. } => {
                if let Some(casts) = self.casts.get_mut(&key.target) {
                    casts.retain(|c| c.key != *key);
                    if casts.is_empty() {
                        self.casts.remove(&key.target);
                    }
                }
            }
        }
    }
}
