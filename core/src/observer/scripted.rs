//! Scripted scenario source
//!
//! Scenario files are TOML descriptions of a short session: a status
//! catalog, the local player's job, and a list of per-tick snapshots.
//!
//! ```toml
//! local_job = 24
//! local_level = 90
//! tick_interval_ms = 100
//!
//! [[statuses]]
//! id = 910
//! name = "Doom"
//!
//! [[ticks]]
//! repeat = 5
//! actors = [
//!     { handle = 1, token = 100, name = "Yda", incapacitated = true },
//!     { handle = 2, token = 200, name = "Xan", watched = false },
//! ]
//! casts = [{ caster = 2, target = 1, action_id = 125, elapsed = 0.0, total = 8.0 }]
//! ```
//!
//! Within a repeated tick, cast elapsed times advance by the tick interval
//! on each repetition (capped at the cast's total).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::casts::CastCategory;
use crate::game_data;

use super::{
    ActiveCast, ActorHandle, CharacterIdentity, GameStateSource, GroupKind, IdentityToken,
    ScenarioError, StatusId, WatchedActor,
};

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_repeat() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_level() -> u8 {
    100
}

/// One entry of the status catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStatus {
    pub id: StatusId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioActor {
    pub handle: ActorHandle,
    /// 0 means the client has not confirmed the identity yet
    #[serde(default)]
    pub token: IdentityToken,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub group: GroupKind,
    #[serde(default)]
    pub incapacitated: bool,
    #[serde(default)]
    pub statuses: Vec<StatusId>,
    /// Unwatched actors are still resolvable (e.g. outside casters)
    #[serde(default = "default_true")]
    pub watched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCast {
    pub caster: ActorHandle,
    pub target: ActorHandle,
    #[serde(default)]
    pub category: Option<CastCategory>,
    /// Alternative to `category`, looked up in the action table
    #[serde(default)]
    pub action_id: Option<u32>,
    #[serde(default)]
    pub elapsed: f32,
    pub total: f32,
}

impl ScenarioCast {
    pub fn resolved_category(&self) -> Option<CastCategory> {
        self.category
            .or_else(|| self.action_id.and_then(game_data::cast_category))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTick {
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    #[serde(default)]
    pub actors: Vec<ScenarioActor>,
    #[serde(default)]
    pub casts: Vec<ScenarioCast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub statuses: Vec<ScenarioStatus>,
    /// Local player's job id; unset means every action is allowed
    #[serde(default)]
    pub local_job: Option<u8>,
    #[serde(default = "default_level")]
    pub local_level: u8,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub ticks: Vec<ScenarioTick>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path).map_err(|source| ScenarioError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse a scenario from an in-memory string
    pub fn from_toml_str(content: &str) -> Result<Self, ScenarioError> {
        Self::parse(content, Path::new("<inline>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ScenarioError> {
        let scenario: Scenario =
            toml::from_str(content).map_err(|source| ScenarioError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?;
        scenario.validate(path)?;
        Ok(scenario)
    }

    fn validate(&self, path: &Path) -> Result<(), ScenarioError> {
        let invalid = |reason: String| ScenarioError::InvalidScenario {
            path: PathBuf::from(path),
            reason,
        };

        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms must be positive".to_string()));
        }
        for (index, tick) in self.ticks.iter().enumerate() {
            if tick.repeat == 0 {
                return Err(invalid(format!("tick {index} has repeat = 0")));
            }
            for cast in &tick.casts {
                if cast.resolved_category().is_none() {
                    return Err(invalid(format!(
                        "tick {index}: cast {:#x} -> {:#x} has no category or known action id",
                        cast.caster, cast.target
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of ticks after expanding repeats
    pub fn total_ticks(&self) -> usize {
        self.ticks.iter().map(|t| t.repeat as usize).sum()
    }
}

/// Fixed epoch for scripted sessions so runs are reproducible
fn scenario_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Replays a `Scenario` one tick at a time
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    scenario: Scenario,
    /// (index into `scenario.ticks`, repetition) per expanded tick
    schedule: Vec<(usize, u32)>,
    cursor: usize,
    start: NaiveDateTime,
}

impl ScriptedSource {
    pub fn new(scenario: Scenario) -> Self {
        let schedule = scenario
            .ticks
            .iter()
            .enumerate()
            .flat_map(|(index, tick)| (0..tick.repeat).map(move |rep| (index, rep)))
            .collect();
        Self {
            scenario,
            schedule,
            cursor: 0,
            start: scenario_epoch(),
        }
    }

    pub fn len(&self) -> usize {
        self.schedule.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    /// True once every scripted tick has been presented
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.schedule.len()
    }

    /// Move to the next scripted tick. Returns false once nothing is left.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.cursor += 1;
        !self.is_finished()
    }

    fn current(&self) -> Option<(&ScenarioTick, u32)> {
        let (index, rep) = *self.schedule.get(self.cursor)?;
        self.scenario.ticks.get(index).map(|tick| (tick, rep))
    }

    fn actor(&self, handle: ActorHandle) -> Option<&ScenarioActor> {
        self.current()
            .and_then(|(tick, _)| tick.actors.iter().find(|a| a.handle == handle))
    }

    fn interval_secs(&self) -> f32 {
        self.scenario.tick_interval_ms as f32 / 1000.0
    }
}

impl GameStateSource for ScriptedSource {
    fn timestamp(&self) -> NaiveDateTime {
        let offset = self.scenario.tick_interval_ms.saturating_mul(self.cursor as u64);
        self.start + chrono::Duration::milliseconds(offset as i64)
    }

    fn watched_actors(&self) -> Vec<WatchedActor> {
        self.current()
            .map(|(tick, _)| {
                tick.actors
                    .iter()
                    .filter(|a| a.watched)
                    .map(|a| WatchedActor {
                        handle: a.handle,
                        group: a.group,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn active_casts(&self) -> Vec<ActiveCast> {
        let Some((tick, rep)) = self.current() else {
            return Vec::new();
        };
        let advance = rep as f32 * self.interval_secs();
        tick.casts
            .iter()
            .filter_map(|cast| {
                let category = cast.resolved_category()?;
                let elapsed = if cast.total > 0.0 {
                    (cast.elapsed + advance).min(cast.total)
                } else {
                    cast.elapsed
                };
                Some(ActiveCast {
                    caster: cast.caster,
                    target: cast.target,
                    category,
                    elapsed,
                    total: cast.total,
                })
            })
            .collect()
    }

    fn status_effects(&self, handle: ActorHandle) -> Vec<StatusId> {
        self.actor(handle)
            .map(|a| a.statuses.clone())
            .unwrap_or_default()
    }

    fn is_incapacitated(&self, handle: ActorHandle) -> bool {
        self.actor(handle).is_some_and(|a| a.incapacitated)
    }

    fn resolve_identity(&self, handle: ActorHandle) -> Option<CharacterIdentity> {
        self.actor(handle).map(|a| CharacterIdentity {
            token: a.token,
            name: a.name.clone(),
        })
    }

    fn is_action_capable(&self, category: CastCategory) -> bool {
        match self.scenario.local_job {
            Some(job) => game_data::is_capable(job, self.scenario.local_level, category),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
        local_job = 23
        local_level = 90
        tick_interval_ms = 500

        [[statuses]]
        id = 910
        name = "Doom"

        [[ticks]]
        repeat = 3
        actors = [
            { handle = 1, token = 100, name = "Yda", incapacitated = true },
            { handle = 2, token = 200, name = "Xan", watched = false },
        ]
        casts = [{ caster = 2, target = 1, action_id = 125, elapsed = 0.0, total = 8.0 }]

        [[ticks]]
        actors = [{ handle = 1, token = 100, name = "Yda", statuses = [910] }]
    "#;

    #[test]
    fn parses_and_expands_repeats() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        assert_eq!(scenario.statuses.len(), 1);
        assert_eq!(scenario.total_ticks(), 4);

        let source = ScriptedSource::new(scenario);
        assert_eq!(source.len(), 4);
        assert_eq!(source.watched_actors().len(), 1);
        assert!(source.is_incapacitated(1));
        assert_eq!(source.resolve_identity(2).unwrap().name, "Xan");
    }

    #[test]
    fn repeated_ticks_advance_cast_time() {
        let mut source = ScriptedSource::new(Scenario::from_toml_str(SCENARIO).unwrap());
        assert_eq!(source.active_casts()[0].elapsed, 0.0);
        assert_eq!(source.active_casts()[0].category, CastCategory::Raise);

        source.advance();
        source.advance();
        assert_eq!(source.active_casts()[0].elapsed, 1.0);
        assert_eq!(source.timestamp() - scenario_epoch(), chrono::Duration::seconds(1));

        assert!(source.advance());
        assert!(source.active_casts().is_empty());
        assert_eq!(source.status_effects(1), vec![910]);

        assert!(!source.advance());
        assert!(source.is_finished());
        assert!(source.watched_actors().is_empty());
    }

    #[test]
    fn job_gate_uses_job_table() {
        let source = ScriptedSource::new(Scenario::from_toml_str(SCENARIO).unwrap());
        // Bard: dispel only
        assert!(!source.is_action_capable(CastCategory::Raise));
        assert!(source.is_action_capable(CastCategory::Dispel));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let bad = r#"
            [[ticks]]
            casts = [{ caster = 1, target = 2, action_id = 999999, total = 2.0 }]
        "#;
        assert!(matches!(
            Scenario::from_toml_str(bad),
            Err(ScenarioError::InvalidScenario { .. })
        ));
        assert!(matches!(
            Scenario::from_toml_str("ticks = 3"),
            Err(ScenarioError::ParseToml { .. })
        ));
    }
}
