//! Cast lifecycle events
//!
//! Produced by the `CastIngestor` from snapshot diffs and consumed by
//! anything that needs to follow casts over time.

use chrono::NaiveDateTime;

use crate::context::IStr;

use super::CastKey;

/// Why a cast stopped being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// No longer reported. Completion and interruption look the same.
    Disappeared,
    /// Still reported but made no progress within the sanity timeout
    Stale,
    /// One of the actors involved was evicted
    Forgotten,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CastEvent {
    Started {
        key: CastKey,
        caster_name: IStr,
        seq: u64,
        started_at: NaiveDateTime,
        elapsed: f32,
        total: f32,
        /// The triple was already tracked but the cast was replaced
        restarted: bool,
    },
    Progressed {
        key: CastKey,
        elapsed: f32,
        total: f32,
    },
    Ended {
        key: CastKey,
        reason: EndReason,
    },
}

/// Trait for systems that follow cast lifecycles.
pub trait CastEventHandler {
    /// Handle a single event
    fn handle_event(&mut self, event: &CastEvent);

    /// Handle multiple events (default implementation calls handle_event for each)
    fn handle_events(&mut self, events: &[CastEvent]) {
        for event in events {
            self.handle_event(event);
        }
    }
}
