//! Source trait and the per-tick snapshot captured from it

use chrono::NaiveDateTime;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::casts::CastCategory;

use super::{ActorHandle, IdentityToken, StatusId};

/// What the client knows about the character behind a handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterIdentity {
    pub token: IdentityToken,
    pub name: String,
}

/// Which group list an actor belongs to (drives frame highlighting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// The local player
    LocalPlayer,
    /// Member of the local player's party
    #[default]
    Party,
    /// Member of another party in the alliance
    Alliance,
    /// Seen only as a caster or target
    Other,
}

/// An actor the source wants watched this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchedActor {
    pub handle: ActorHandle,
    pub group: GroupKind,
}

/// One cast in progress as reported by the source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveCast {
    pub caster: ActorHandle,
    pub target: ActorHandle,
    pub category: CastCategory,
    /// Seconds since the cast began
    pub elapsed: f32,
    /// Full cast time in seconds
    pub total: f32,
}

impl ActiveCast {
    /// Reject timings that cannot come from a real cast
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.elapsed.is_finite() || !self.total.is_finite() {
            return Err("non-finite cast timing");
        }
        if self.elapsed < 0.0 {
            return Err("negative elapsed time");
        }
        if self.total <= 0.0 {
            return Err("non-positive cast duration");
        }
        Ok(())
    }
}

/// Whether the local player can currently perform each action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub raise: bool,
    pub dispel: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            raise: true,
            dispel: true,
        }
    }
}

impl Capabilities {
    pub fn allows(&self, category: CastCategory) -> bool {
        match category {
            CastCategory::Raise => self.raise,
            CastCategory::Dispel => self.dispel,
        }
    }
}

/// External game-state collaborator.
///
/// All reads are synchronous and are performed once per tick, at the start
/// of the tick, by `ObservationSnapshot::capture`.
pub trait GameStateSource {
    /// Game time of the current tick
    fn timestamp(&self) -> NaiveDateTime;

    /// Party/alliance members (and the local player) to watch
    fn watched_actors(&self) -> Vec<WatchedActor>;

    fn active_casts(&self) -> Vec<ActiveCast>;

    fn status_effects(&self, handle: ActorHandle) -> Vec<StatusId>;

    fn is_incapacitated(&self, handle: ActorHandle) -> bool;

    fn resolve_identity(&self, handle: ActorHandle) -> Option<CharacterIdentity>;

    /// Job restriction gate for the local player
    fn is_action_capable(&self, category: CastCategory) -> bool;
}

/// Everything known about one handle this tick
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedActor {
    pub handle: ActorHandle,
    pub group: GroupKind,
    pub identity: Option<CharacterIdentity>,
    pub incapacitated: bool,
    pub statuses: Vec<StatusId>,
}

/// Immutable capture of the source at tick start
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSnapshot {
    pub timestamp: NaiveDateTime,
    pub actors: Vec<ObservedActor>,
    pub casts: Vec<ActiveCast>,
    pub capabilities: Capabilities,
}

impl ObservationSnapshot {
    /// Read everything needed for one tick from `source`.
    ///
    /// Handles that appear only as a caster or target are observed too
    /// (grouped as `Other`) so their identity can be resolved.
    pub fn capture(source: &dyn GameStateSource) -> Self {
        let mut seen: HashSet<ActorHandle> = HashSet::new();
        let mut actors = Vec::new();

        for watched in source.watched_actors() {
            if seen.insert(watched.handle) {
                actors.push(observe(source, watched.handle, watched.group));
            }
        }

        let casts = source.active_casts();
        for cast in &casts {
            for handle in [cast.caster, cast.target] {
                if seen.insert(handle) {
                    actors.push(observe(source, handle, GroupKind::Other));
                }
            }
        }

        Self {
            timestamp: source.timestamp(),
            actors,
            casts,
            capabilities: Capabilities {
                raise: source.is_action_capable(CastCategory::Raise),
                dispel: source.is_action_capable(CastCategory::Dispel),
            },
        }
    }
}

fn observe(source: &dyn GameStateSource, handle: ActorHandle, group: GroupKind) -> ObservedActor {
    ObservedActor {
        handle,
        group,
        identity: source.resolve_identity(handle),
        incapacitated: source.is_incapacitated(handle),
        statuses: source.status_effects(handle),
    }
}

/// A source with nothing in it. Keeps the clock running for synthetic mode.
#[derive(Debug, Clone, Copy)]
pub struct IdleSource {
    pub timestamp: NaiveDateTime,
}

impl GameStateSource for IdleSource {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    fn watched_actors(&self) -> Vec<WatchedActor> {
        Vec::new()
    }

    fn active_casts(&self) -> Vec<ActiveCast> {
        Vec::new()
    }

    fn status_effects(&self, _handle: ActorHandle) -> Vec<StatusId> {
        Vec::new()
    }

    fn is_incapacitated(&self, _handle: ActorHandle) -> bool {
        false
    }

    fn resolve_identity(&self, _handle: ActorHandle) -> Option<CharacterIdentity> {
        None
    }

    fn is_action_capable(&self, _category: CastCategory) -> bool {
        true
    }
}
