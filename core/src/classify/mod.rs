//! Highlight classification
//!
//! Fuses the cast index and status state of each target into one
//! `RaiseState` and one `DispelState` per tick. Only the liveness memory
//! behind `AlreadyRaised` survives between ticks; everything else is
//! recomputed.

mod engine;
mod state;

#[cfg(test)]
mod engine_tests;

pub use engine::{ActorObservation, ClassificationEngine};
pub use state::{DispelState, RaiseState, TargetClassification};
