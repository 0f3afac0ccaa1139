//! Transient handle → stable actor resolution
//!
//! Game object handles are reused freely by the client: a handle that
//! pointed at one character a moment ago can point at another now, and a
//! character can come back under a fresh handle after a zone change. Actors
//! are therefore keyed by the character identity token, and handles are only
//! a cache in front of that.
//!
//! `ActorId` is an index into a slot arena plus a generation. When a slot is
//! evicted and later reused for someone else, the generation is bumped so a
//! stale `ActorId` held anywhere in the pipeline no longer resolves.

use std::fmt;

use hashbrown::HashMap;

use crate::context::{IStr, intern};
use crate::error::TrackingIssue;
use crate::observer::{ActorHandle, CharacterIdentity, IdentityToken};

/// Identity token the client reports for "not known yet"
pub const INVALID_IDENTITY: IdentityToken = 0;

/// Stable logical identifier for a tracked character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId {
    index: u32,
    generation: u32,
}

impl ActorId {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct ActorSlot {
    identity: IdentityToken,
    name: IStr,
    generation: u32,
    last_seen_tick: u64,
    occupied: bool,
}

#[derive(Debug, Clone, Copy)]
struct HandleBinding {
    actor: ActorId,
    identity: IdentityToken,
    last_seen_tick: u64,
}

/// Result of resolving one tick's worth of handles
#[derive(Debug, Default)]
pub struct ResolvedTick {
    /// Every handle that resolved this tick
    pub actors: HashMap<ActorHandle, ActorId>,
    /// Handles that could not be resolved (skipped, not fatal)
    pub issues: Vec<TrackingIssue>,
    /// Actors dropped from the cache at the end of this tick
    pub evicted: Vec<ActorId>,
}

impl ResolvedTick {
    pub fn get(&self, handle: ActorHandle) -> Option<ActorId> {
        self.actors.get(&handle).copied()
    }
}

/// Maps transient handles to stable `ActorId`s across ticks.
#[derive(Debug)]
pub struct IdentityResolver {
    slots: Vec<ActorSlot>,
    free: Vec<u32>,
    by_identity: HashMap<IdentityToken, ActorId>,
    by_handle: HashMap<ActorHandle, HandleBinding>,
    tick: u64,
    evict_after_ticks: u32,
}

impl IdentityResolver {
    pub fn new(evict_after_ticks: u32) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            by_identity: HashMap::new(),
            by_handle: HashMap::new(),
            tick: 0,
            evict_after_ticks: evict_after_ticks.max(1),
        }
    }

    pub fn set_evict_after_ticks(&mut self, ticks: u32) {
        self.evict_after_ticks = ticks.max(1);
    }

    /// Number of live actors in the cache
    pub fn len(&self) -> usize {
        self.by_identity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identity.is_empty()
    }

    /// Resolve all handles observed this tick, then evict anything that has
    /// gone unseen for too long.
    pub fn resolve_tick(
        &mut self,
        entries: &[(ActorHandle, Option<CharacterIdentity>)],
    ) -> ResolvedTick {
        self.tick += 1;
        let mut resolved = ResolvedTick::default();

        for (handle, identity) in entries {
            match self.resolve_one(*handle, identity.as_ref()) {
                Ok(actor) => {
                    resolved.actors.insert(*handle, actor);
                }
                Err(issue) => resolved.issues.push(issue),
            }
        }

        resolved.evicted = self.evict_unseen();
        resolved
    }

    /// Whether `actor` still refers to a live slot
    pub fn is_live(&self, actor: ActorId) -> bool {
        self.slot(actor).is_some()
    }

    /// Current display name for a live actor
    pub fn name(&self, actor: ActorId) -> Option<IStr> {
        self.slot(actor).map(|slot| slot.name)
    }

    /// Actor currently bound to a handle (as of the last resolved tick)
    pub fn lookup_handle(&self, handle: ActorHandle) -> Option<ActorId> {
        self.by_handle
            .get(&handle)
            .map(|binding| binding.actor)
            .filter(|actor| self.is_live(*actor))
    }

    fn slot(&self, actor: ActorId) -> Option<&ActorSlot> {
        self.slots
            .get(actor.index as usize)
            .filter(|slot| slot.occupied && slot.generation == actor.generation)
    }

    fn resolve_one(
        &mut self,
        handle: ActorHandle,
        identity: Option<&CharacterIdentity>,
    ) -> Result<ActorId, TrackingIssue> {
        let identity = identity
            .filter(|id| id.token != INVALID_IDENTITY)
            .ok_or(TrackingIssue::IdentityUnresolved { handle })?;

        if let Some(binding) = self.by_handle.get(&handle).copied() {
            if binding.identity == identity.token && self.is_live(binding.actor) {
                self.touch(binding.actor, &identity.name);
                if let Some(b) = self.by_handle.get_mut(&handle) {
                    b.last_seen_tick = self.tick;
                }
                return Ok(binding.actor);
            }

            if binding.identity != identity.token {
                tracing::debug!(
                    handle,
                    old_identity = binding.identity,
                    new_identity = identity.token,
                    "Handle reassigned to a different character"
                );
            }
            self.by_handle.remove(&handle);
        }

        let actor = match self.by_identity.get(&identity.token).copied() {
            Some(actor) if self.is_live(actor) => actor,
            _ => self.mint(identity),
        };
        self.touch(actor, &identity.name);
        self.by_handle.insert(
            handle,
            HandleBinding {
                actor,
                identity: identity.token,
                last_seen_tick: self.tick,
            },
        );
        Ok(actor)
    }

    fn mint(&mut self, identity: &CharacterIdentity) -> ActorId {
        let name = intern(&identity.name);
        let actor = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                slot.identity = identity.token;
                slot.name = name;
                slot.last_seen_tick = self.tick;
                slot.occupied = true;
                ActorId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(ActorSlot {
                    identity: identity.token,
                    name,
                    generation: 0,
                    last_seen_tick: self.tick,
                    occupied: true,
                });
                ActorId {
                    index,
                    generation: 0,
                }
            }
        };

        tracing::debug!(%actor, identity = identity.token, name = %identity.name, "New actor");
        self.by_identity.insert(identity.token, actor);
        actor
    }

    fn touch(&mut self, actor: ActorId, name: &str) {
        let tick = self.tick;
        if let Some(slot) = self.slots.get_mut(actor.index as usize) {
            slot.last_seen_tick = tick;
            if crate::context::resolve(slot.name) != name {
                slot.name = intern(name);
            }
        }
    }

    fn evict_unseen(&mut self) -> Vec<ActorId> {
        let tick = self.tick;
        let limit = u64::from(self.evict_after_ticks);

        self.by_handle
            .retain(|_, binding| tick - binding.last_seen_tick < limit);

        let mut evicted = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.occupied && tick - slot.last_seen_tick >= limit {
                slot.occupied = false;
                self.by_identity.remove(&slot.identity);
                self.free.push(index as u32);
                evicted.push(ActorId {
                    index: index as u32,
                    generation: slot.generation,
                });
            }
        }

        if !evicted.is_empty() {
            tracing::debug!(count = evicted.len(), "Evicted unseen actors");
            // Bindings may still point at a just-evicted actor
            let slots = &self.slots;
            self.by_handle.retain(|_, binding| {
                slots
                    .get(binding.actor.index as usize)
                    .is_some_and(|s| s.occupied && s.generation == binding.actor.generation)
            });
        }
        evicted
    }
}
