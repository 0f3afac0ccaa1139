//! Observation sources
//!
//! Everything the engine knows about the game arrives through a
//! `GameStateSource`, captured once per tick into an `ObservationSnapshot`.
//! The synthetic source stands in for live input when a test mode is active.

mod error;
mod scripted;
mod snapshot;
mod synthetic;

pub use error::ScenarioError;
pub use scripted::{Scenario, ScenarioActor, ScenarioCast, ScenarioStatus, ScenarioTick, ScriptedSource};
pub use snapshot::{
    ActiveCast, Capabilities, CharacterIdentity, GameStateSource, GroupKind, IdleSource,
    ObservationSnapshot, ObservedActor, WatchedActor,
};
pub use synthetic::{
    ObservationMode, SYNTHETIC_CAST_SECS, SyntheticState, synthetic_snapshot, synthetic_target_handle,
};

/// Transient game object handle. Reused by the client.
pub type ActorHandle = u32;

/// Stable character identity reported by the client (0 = not known yet)
pub type IdentityToken = u64;

/// Raw status effect id
pub type StatusId = u32;
