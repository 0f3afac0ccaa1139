//! Status effect watching
//!
//! The `StatusSet` decides which status ids count as "dispellable" for
//! highlighting; the `StatusTracker` applies it to each actor every tick.

mod status_set;
mod tracker;

#[cfg(test)]
mod status_set_tests;

pub use status_set::{StatusEntry, StatusList, StatusSet};
pub use tracker::{StatusState, StatusTracker, has_watched_status};
