//! Per-actor watched status computation

use hashbrown::HashMap;

use crate::identity::ActorId;
use crate::observer::StatusId;

use super::StatusSet;

/// Whether any of `statuses` is monitored by `set`.
///
/// The sets are mutually exclusive, so membership in the enabled set is
/// enough. Job capability never enters into this.
pub fn has_watched_status(statuses: &[StatusId], set: &StatusSet) -> bool {
    statuses.iter().any(|id| set.is_watched(*id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusState {
    pub actor: ActorId,
    pub has_watched_status: bool,
}

/// Recomputed from scratch every tick
#[derive(Debug, Default)]
pub struct StatusTracker {
    states: HashMap<ActorId, bool>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all state with this tick's observations
    pub fn update<'a>(
        &mut self,
        observed: impl IntoIterator<Item = (ActorId, &'a [StatusId])>,
        set: &StatusSet,
    ) {
        self.states.clear();
        for (actor, statuses) in observed {
            let watched = has_watched_status(statuses, set);
            // Same actor reported under two handles: any hit counts
            *self.states.entry(actor).or_insert(false) |= watched;
        }
    }

    pub fn has_watched_status(&self, actor: ActorId) -> bool {
        self.states.get(&actor).copied().unwrap_or(false)
    }

    pub fn state(&self, actor: ActorId) -> Option<StatusState> {
        self.states.get(&actor).map(|&has| StatusState {
            actor,
            has_watched_status: has,
        })
    }

    pub fn watched_count(&self) -> usize {
        self.states.values().filter(|v| **v).count()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}
