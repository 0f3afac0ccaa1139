//! Synthetic observation for test mode
//!
//! Each `SyntheticState` is a hand-built snapshot that drives one fake party
//! member into the matching highlight state, so colors and icons can be
//! checked without waiting for a real raise or dispel.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};

use crate::casts::CastCategory;

use super::{
    ActiveCast, ActorHandle, Capabilities, CharacterIdentity, GroupKind, IdentityToken,
    ObservationSnapshot, ObservedActor, StatusId,
};

// Reserved handles and tokens, far away from anything the client hands out
const SELF_HANDLE: ActorHandle = 0xE000_0001;
const TARGET_HANDLE: ActorHandle = 0xE000_0002;
const PARTNER_HANDLE: ActorHandle = 0xE000_0003;

const SELF_TOKEN: IdentityToken = 0xE000_0000_0000_0001;
const TARGET_TOKEN: IdentityToken = 0xE000_0000_0000_0002;
const PARTNER_TOKEN: IdentityToken = 0xE000_0000_0000_0003;

pub const SYNTHETIC_CAST_SECS: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntheticState {
    BeingRaised,
    RedundantRaiseCompeting,
    RedundantRaiseAlreadyRaised,
    Dispellable,
    BeingDispelled,
    RedundantDispel,
}

impl SyntheticState {
    pub const ALL: [SyntheticState; 6] = [
        SyntheticState::BeingRaised,
        SyntheticState::RedundantRaiseCompeting,
        SyntheticState::RedundantRaiseAlreadyRaised,
        SyntheticState::Dispellable,
        SyntheticState::BeingDispelled,
        SyntheticState::RedundantDispel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SyntheticState::BeingRaised => "being_raised",
            SyntheticState::RedundantRaiseCompeting => "redundant_raise_competing",
            SyntheticState::RedundantRaiseAlreadyRaised => "redundant_raise_already_raised",
            SyntheticState::Dispellable => "dispellable",
            SyntheticState::BeingDispelled => "being_dispelled",
            SyntheticState::RedundantDispel => "redundant_dispel",
        }
    }

    fn is_raise(&self) -> bool {
        matches!(
            self,
            SyntheticState::BeingRaised
                | SyntheticState::RedundantRaiseCompeting
                | SyntheticState::RedundantRaiseAlreadyRaised
        )
    }
}

impl fmt::Display for SyntheticState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SyntheticState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        SyntheticState::ALL
            .into_iter()
            .find(|state| state.label() == normalized)
            .ok_or_else(|| format!("unknown test state '{s}'"))
    }
}

/// Where the pipeline takes its observations from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObservationMode {
    #[default]
    Live,
    Synthetic(SyntheticState),
}

impl fmt::Display for ObservationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationMode::Live => f.write_str("off"),
            ObservationMode::Synthetic(state) => state.fmt(f),
        }
    }
}

impl FromStr for ObservationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "live" | "none" => Ok(ObservationMode::Live),
            _ => s.parse().map(ObservationMode::Synthetic),
        }
    }
}

fn identity(token: IdentityToken, name: &str) -> Option<CharacterIdentity> {
    Some(CharacterIdentity {
        token,
        name: name.to_string(),
    })
}

fn actor(
    handle: ActorHandle,
    group: GroupKind,
    id: Option<CharacterIdentity>,
    incapacitated: bool,
    statuses: Vec<StatusId>,
) -> ObservedActor {
    ObservedActor {
        handle,
        group,
        identity: id,
        incapacitated,
        statuses,
    }
}

/// Build the snapshot for `state` at time `now`, where `since` is the first
/// tick spent in this state.
///
/// Cast elapsed time follows the clock so the casts keep progressing and
/// loop every `SYNTHETIC_CAST_SECS`. The already-raised state instead shows
/// the target down on its first tick and up afterwards, with the raise
/// carried over until it completes. `watched_status` is attached to the
/// target in the dispellable states; with no watched status available those
/// states cannot show a status highlight.
pub fn synthetic_snapshot(
    state: SyntheticState,
    now: NaiveDateTime,
    since: NaiveDateTime,
    watched_status: Option<StatusId>,
) -> ObservationSnapshot {
    let loop_ms = (SYNTHETIC_CAST_SECS * 1000.0) as u32;
    let millis = (now.second() * 1000 + now.nanosecond() / 1_000_000) % loop_ms;
    let mut elapsed = millis as f32 / 1000.0;

    let first_tick = now <= since;
    if state == SyntheticState::RedundantRaiseAlreadyRaised {
        elapsed = (now - since).num_milliseconds().max(0) as f32 / 1000.0;
    }

    let category = if state.is_raise() {
        CastCategory::Raise
    } else {
        CastCategory::Dispel
    };
    let cast = |caster: ActorHandle| ActiveCast {
        caster,
        target: TARGET_HANDLE,
        category,
        elapsed,
        total: SYNTHETIC_CAST_SECS,
    };

    let (target_down, with_status, casts) = match state {
        SyntheticState::BeingRaised => (true, false, vec![cast(SELF_HANDLE)]),
        SyntheticState::RedundantRaiseCompeting => {
            (true, false, vec![cast(SELF_HANDLE), cast(PARTNER_HANDLE)])
        }
        SyntheticState::RedundantRaiseAlreadyRaised => {
            let casts = if elapsed < SYNTHETIC_CAST_SECS {
                vec![cast(SELF_HANDLE)]
            } else {
                Vec::new()
            };
            (first_tick, false, casts)
        }
        SyntheticState::Dispellable => (false, true, Vec::new()),
        SyntheticState::BeingDispelled => (false, true, vec![cast(SELF_HANDLE)]),
        SyntheticState::RedundantDispel => (false, false, vec![cast(SELF_HANDLE)]),
    };

    let statuses = match (with_status, watched_status) {
        (true, Some(id)) => vec![id],
        _ => Vec::new(),
    };

    ObservationSnapshot {
        timestamp: now,
        actors: vec![
            actor(
                SELF_HANDLE,
                GroupKind::LocalPlayer,
                identity(SELF_TOKEN, "You"),
                false,
                Vec::new(),
            ),
            actor(
                TARGET_HANDLE,
                GroupKind::Party,
                identity(TARGET_TOKEN, "Current Target"),
                target_down,
                statuses,
            ),
            actor(
                PARTNER_HANDLE,
                GroupKind::Party,
                identity(PARTNER_TOKEN, "Party Member"),
                false,
                Vec::new(),
            ),
        ],
        casts,
        capabilities: Capabilities::default(),
    }
}

/// Handle of the synthetic actor whose state is being demonstrated
pub fn synthetic_target_handle() -> ActorHandle {
    TARGET_HANDLE
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(secs: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(0, 0, secs, ms)
            .unwrap()
    }

    #[test]
    fn parse_states_and_modes() {
        for state in SyntheticState::ALL {
            assert_eq!(state.label().parse::<SyntheticState>(), Ok(state));
        }
        assert_eq!(
            "Being-Raised".parse::<SyntheticState>(),
            Ok(SyntheticState::BeingRaised)
        );
        assert_eq!("off".parse::<ObservationMode>(), Ok(ObservationMode::Live));
        assert_eq!(
            "dispellable".parse::<ObservationMode>(),
            Ok(ObservationMode::Synthetic(SyntheticState::Dispellable))
        );
        assert!("bogus".parse::<ObservationMode>().is_err());
    }

    #[test]
    fn competing_raise_has_two_casters() {
        let snap = synthetic_snapshot(
            SyntheticState::RedundantRaiseCompeting,
            at(1, 500),
            at(0, 0),
            None,
        );
        assert_eq!(snap.casts.len(), 2);
        assert!(snap.casts.iter().all(|c| c.target == TARGET_HANDLE));
        assert_eq!(snap.casts[0].elapsed, 1.5);
        let target = snap.actors.iter().find(|a| a.handle == TARGET_HANDLE).unwrap();
        assert!(target.incapacitated);
    }

    #[test]
    fn dispellable_attaches_watched_status() {
        let snap = synthetic_snapshot(SyntheticState::Dispellable, at(0, 0), at(0, 0), Some(42));
        let target = snap.actors.iter().find(|a| a.handle == TARGET_HANDLE).unwrap();
        assert_eq!(target.statuses, vec![42]);
        assert!(snap.casts.is_empty());

        let snap = synthetic_snapshot(SyntheticState::RedundantDispel, at(0, 0), at(0, 0), Some(42));
        let target = snap.actors.iter().find(|a| a.handle == TARGET_HANDLE).unwrap();
        assert!(target.statuses.is_empty());
        assert_eq!(snap.casts[0].category, CastCategory::Dispel);
    }

    #[test]
    fn already_raised_target_gets_up_after_first_tick() {
        let state = SyntheticState::RedundantRaiseAlreadyRaised;
        let target_down = |snap: &ObservationSnapshot| {
            snap.actors
                .iter()
                .find(|a| a.handle == TARGET_HANDLE)
                .unwrap()
                .incapacitated
        };

        let first = synthetic_snapshot(state, at(5, 0), at(5, 0), None);
        assert!(target_down(&first));
        assert_eq!(first.casts[0].elapsed, 0.0);

        let later = synthetic_snapshot(state, at(7, 500), at(5, 0), None);
        assert!(!target_down(&later));
        assert_eq!(later.casts[0].elapsed, 2.5);

        // Raise has landed: no wrap back to zero
        let done = synthetic_snapshot(state, at(14, 0), at(5, 0), None);
        assert!(!target_down(&done));
        assert!(done.casts.is_empty());
    }

    #[test]
    fn elapsed_loops_with_the_clock() {
        let snap = synthetic_snapshot(SyntheticState::BeingRaised, at(9, 0), at(0, 0), None);
        assert_eq!(snap.casts[0].elapsed, 1.0);
    }
}
