//! Recoverable per-tick tracking issues
//!
//! None of these abort a tick. They are collected into the `TickReport`
//! and logged; the affected actor simply gets no highlight this tick.

use thiserror::Error;

use crate::casts::CastCategory;
use crate::identity::ActorId;
use crate::observer::ActorHandle;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackingIssue {
    #[error("actor handle {handle:#x} has no confirmed identity")]
    IdentityUnresolved { handle: ActorHandle },

    #[error("{category} cast by {caster} on {target} made no progress for {idle_secs:.1}s")]
    StaleCastRecord {
        caster: ActorId,
        target: ActorId,
        category: CastCategory,
        idle_secs: f32,
    },

    #[error("{category} cast by {caster} on {target} ended (completed or interrupted)")]
    AmbiguousCastTermination {
        caster: ActorId,
        target: ActorId,
        category: CastCategory,
    },

    #[error("malformed cast from handle {caster:#x}: {reason}")]
    MalformedCast {
        caster: ActorHandle,
        reason: &'static str,
    },
}

impl TrackingIssue {
    /// Whether the issue is worth surfacing above trace level.
    /// Cast terminations happen every few seconds during normal play.
    pub fn is_noteworthy(&self) -> bool {
        !matches!(self, TrackingIssue::AmbiguousCastTermination { .. })
    }
}
