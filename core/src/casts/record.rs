//! Cast records (runtime state)
//!
//! A `CastRecord` is one caster's in-progress raise or dispel on one
//! target. Records are keyed by (caster, target, category); two casters on
//! the same target are always two records.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::context::IStr;
use crate::identity::ActorId;

/// The two kinds of cast the engine cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastCategory {
    Raise,
    Dispel,
}

impl CastCategory {
    pub const ALL: [CastCategory; 2] = [CastCategory::Raise, CastCategory::Dispel];
}

impl fmt::Display for CastCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastCategory::Raise => write!(f, "raise"),
            CastCategory::Dispel => write!(f, "dispel"),
        }
    }
}

/// Identifies a unique cast in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastKey {
    pub caster: ActorId,
    pub target: ActorId,
    pub category: CastCategory,
}

/// A cast after its handles have been resolved to actors
#[derive(Debug, Clone, Copy)]
pub struct ObservedCast {
    pub key: CastKey,
    pub caster_name: IStr,
    pub elapsed: f32,
    pub total: f32,
}

#[derive(Debug, Clone)]
pub struct CastRecord {
    pub key: CastKey,
    pub caster_name: IStr,

    /// Monotonic arrival order, used to order caster names
    pub seq: u64,

    /// Tick timestamp at which the cast was first observed
    pub started_at: NaiveDateTime,

    /// Tick timestamp at which elapsed last advanced
    pub last_progress_at: NaiveDateTime,

    pub elapsed: f32,
    pub total: f32,

    /// Dropped as stale but still reported by the source.
    /// Stays suppressed until it progresses again or disappears.
    pub stale: bool,
}

impl CastRecord {
    pub fn new(cast: &ObservedCast, seq: u64, now: NaiveDateTime) -> Self {
        Self {
            key: cast.key,
            caster_name: cast.caster_name,
            seq,
            started_at: now,
            last_progress_at: now,
            elapsed: cast.elapsed,
            total: cast.total,
            stale: false,
        }
    }

    /// Whether a new observation of the same triple is really a different
    /// cast reusing the ids (time went backwards or the cast length changed)
    pub fn is_replaced_by(&self, cast: &ObservedCast) -> bool {
        cast.elapsed < self.elapsed || (cast.total - self.total).abs() > f32::EPSILON
    }

    /// Seconds since elapsed last advanced
    pub fn idle_secs(&self, now: NaiveDateTime) -> f32 {
        (now - self.last_progress_at).num_milliseconds().max(0) as f32 / 1000.0
    }
}
