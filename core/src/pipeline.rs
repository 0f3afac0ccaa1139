//! Per-tick highlight pipeline
//!
//! One `tick` runs the whole chain against a single snapshot:
//!
//! ```text
//! capture ─► resolve identities ─► ingest casts ─► track statuses ─► classify
//! ```
//!
//! Projection happens on demand through `render`. Configuration is held as
//! an `Arc` snapshot; `apply_config` only stages a new one, which takes
//! effect at the start of the next tick.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::casts::{CastEvent, CastEventHandler, CastIngestor, CastKey, ObservedCast};
use crate::classify::{ActorObservation, ClassificationEngine, TargetClassification};
use crate::context::{AppConfig, HighlightConfig, TrackingSettings, empty_istr, resolve};
use crate::error::TrackingIssue;
use crate::identity::{ActorId, IdentityResolver};
use crate::observer::{
    ActorHandle, Capabilities, GameStateSource, ObservationMode, ObservationSnapshot, StatusId,
    synthetic_snapshot,
};
use crate::render::{RenderDescription, project};
use crate::status::{StatusSet, StatusTracker};

/// Immutable configuration consumed by a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerConfig {
    pub highlight: HighlightConfig,
    pub tracking: TrackingSettings,
    pub status_set: StatusSet,
}

impl TrackerConfig {
    /// Combine the persisted config with the known status catalog
    pub fn from_app_config(
        app: &AppConfig,
        catalog: impl IntoIterator<Item = (StatusId, String)>,
    ) -> Self {
        Self {
            highlight: app.highlight.clone(),
            tracking: app.tracking.clone(),
            status_set: StatusSet::from_catalog(catalog, &app.disabled_statuses),
        }
    }

    /// The persistable part of this config
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            highlight: self.highlight.clone(),
            tracking: self.tracking.clone(),
            disabled_statuses: self.status_set.disabled_ids(),
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    pub timestamp: NaiveDateTime,
    pub mode: ObservationMode,
    /// Handles resolved to actors this tick
    pub resolved: usize,
    pub events: Vec<CastEvent>,
    pub issues: Vec<TrackingIssue>,
    pub evicted: Vec<ActorId>,
    /// Actors with at least one non-None state
    pub highlighted: usize,
    pub config_applied: bool,
}

impl TickReport {
    pub fn noteworthy_issues(&self) -> impl Iterator<Item = &TrackingIssue> {
        self.issues.iter().filter(|i| i.is_noteworthy())
    }
}

/// One line of the per-actor debug listing
#[derive(Debug, Clone, PartialEq)]
pub struct DebugRow {
    pub actor: ActorId,
    pub name: String,
    pub raise: &'static str,
    pub dispel: &'static str,
    /// "raise X 2.0s, dispel Z 0.5s"
    pub casts: String,
}

pub struct HighlightPipeline {
    config: Arc<TrackerConfig>,
    pending: Option<Arc<TrackerConfig>>,
    mode: ObservationMode,

    resolver: IdentityResolver,
    ingestor: CastIngestor,
    statuses: StatusTracker,
    engine: ClassificationEngine,

    capabilities: Capabilities,
    tick: u64,
    /// First tick timestamp in the current synthetic state
    synthetic_since: Option<NaiveDateTime>,
}

impl HighlightPipeline {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            resolver: IdentityResolver::new(config.tracking.evict_after_ticks),
            ingestor: CastIngestor::new(config.tracking.stale_cast_secs),
            statuses: StatusTracker::new(),
            engine: ClassificationEngine::new(),
            config: Arc::new(config),
            pending: None,
            mode: ObservationMode::Live,
            capabilities: Capabilities::default(),
            tick: 0,
            synthetic_since: None,
        }
    }

    /// Configuration in effect for the current tick
    pub fn config(&self) -> Arc<TrackerConfig> {
        Arc::clone(&self.config)
    }

    /// Most recent configuration, including one staged but not yet applied
    pub fn latest_config(&self) -> Arc<TrackerConfig> {
        Arc::clone(self.pending.as_ref().unwrap_or(&self.config))
    }

    /// Stage a new configuration for the next tick
    pub fn apply_config(&mut self, config: TrackerConfig) {
        self.pending = Some(Arc::new(config));
    }

    /// Stage an edit of the latest configuration
    pub fn update_config(&mut self, edit: impl FnOnce(&mut TrackerConfig)) {
        let mut next = (*self.latest_config()).clone();
        edit(&mut next);
        self.apply_config(next);
    }

    pub fn has_pending_config(&self) -> bool {
        self.pending.is_some()
    }

    pub fn mode(&self) -> ObservationMode {
        self.mode
    }

    /// Switch observation mode. Tracked state is discarded on a change so
    /// synthetic actors never leak into live classification and vice versa.
    pub fn set_mode(&mut self, mode: ObservationMode) {
        if mode == self.mode {
            return;
        }
        tracing::info!(from = %self.mode, to = %mode, "Observation mode changed");
        self.mode = mode;
        self.reset();
    }

    /// Forget every actor, cast and classification
    pub fn reset(&mut self) {
        self.resolver = IdentityResolver::new(self.config.tracking.evict_after_ticks);
        self.ingestor.clear();
        self.statuses.clear();
        self.engine.clear();
        self.capabilities = Capabilities::default();
        self.synthetic_since = None;
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Run one tick against `source`. In synthetic mode only the source's
    /// clock is read.
    pub fn tick(&mut self, source: &dyn GameStateSource) -> TickReport {
        let config_applied = self.begin_tick();
        let snapshot = match self.mode {
            ObservationMode::Live => ObservationSnapshot::capture(source),
            ObservationMode::Synthetic(state) => {
                let now = source.timestamp();
                let since = *self.synthetic_since.get_or_insert(now);
                synthetic_snapshot(state, now, since, self.config.status_set.first_enabled())
            }
        };
        let mut report = self.run(&snapshot);
        report.config_applied |= config_applied;
        report
    }

    /// Run one tick against an already captured snapshot
    pub fn tick_snapshot(&mut self, snapshot: &ObservationSnapshot) -> TickReport {
        let config_applied = self.begin_tick();
        let mut report = self.run(snapshot);
        report.config_applied = config_applied;
        report
    }

    fn begin_tick(&mut self) -> bool {
        let Some(next) = self.pending.take() else {
            return false;
        };
        self.resolver
            .set_evict_after_ticks(next.tracking.evict_after_ticks);
        self.ingestor
            .set_stale_cast_secs(next.tracking.stale_cast_secs);
        self.config = next;
        tracing::debug!("Applied new configuration");
        true
    }

    fn run(&mut self, snapshot: &ObservationSnapshot) -> TickReport {
        self.tick += 1;
        let now = snapshot.timestamp;

        // 1. Identity
        let entries: Vec<(ActorHandle, Option<_>)> = snapshot
            .actors
            .iter()
            .map(|a| (a.handle, a.identity.clone()))
            .collect();
        let mut resolved = self.resolver.resolve_tick(&entries);
        let mut issues = std::mem::take(&mut resolved.issues);
        let mut events = Vec::new();

        for actor in &resolved.evicted {
            let forgotten = self.ingestor.forget_actor(*actor);
            self.engine.handle_events(&forgotten);
            self.engine.forget(*actor);
            events.extend(forgotten);
        }

        // 2. Casts
        let mut observed = Vec::with_capacity(snapshot.casts.len());
        for cast in &snapshot.casts {
            if let Err(reason) = cast.validate() {
                issues.push(TrackingIssue::MalformedCast {
                    caster: cast.caster,
                    reason,
                });
                continue;
            }
            let (Some(caster), Some(target)) =
                (resolved.get(cast.caster), resolved.get(cast.target))
            else {
                continue;
            };
            observed.push(ObservedCast {
                key: CastKey {
                    caster,
                    target,
                    category: cast.category,
                },
                caster_name: self.resolver.name(caster).unwrap_or_else(empty_istr),
                elapsed: cast.elapsed,
                total: cast.total,
            });
        }
        let outcome = self.ingestor.ingest(&observed, now);
        self.engine.handle_events(&outcome.events);
        events.extend(outcome.events);
        issues.extend(outcome.issues);

        // 3. Statuses
        let config = Arc::clone(&self.config);
        self.statuses.update(
            snapshot.actors.iter().filter_map(|a| {
                resolved
                    .get(a.handle)
                    .map(|actor| (actor, a.statuses.as_slice()))
            }),
            &config.status_set,
        );

        // 4. Classification
        let observations: Vec<ActorObservation> = snapshot
            .actors
            .iter()
            .filter_map(|a| {
                let actor = resolved.get(a.handle)?;
                Some(ActorObservation {
                    actor,
                    name: self.resolver.name(actor).unwrap_or_else(empty_istr),
                    group: a.group,
                    incapacitated: a.incapacitated,
                    has_status: self.statuses.has_watched_status(actor),
                })
            })
            .collect();
        self.engine.classify(&observations, now);
        self.capabilities = snapshot.capabilities;

        log_issues(&issues);

        let highlighted = self
            .engine
            .classifications()
            .filter(|c| c.is_highlighted())
            .count();
        tracing::trace!(
            tick = self.tick,
            actors = resolved.actors.len(),
            casts = self.ingestor.active_count(),
            events = events.len(),
            highlighted,
            "Tick complete"
        );

        TickReport {
            tick: self.tick,
            timestamp: now,
            mode: self.mode,
            resolved: resolved.actors.len(),
            events,
            issues,
            evicted: resolved.evicted,
            highlighted,
            config_applied: false,
        }
    }

    pub fn classification(&self, actor: ActorId) -> Option<&TargetClassification> {
        self.engine.classification(actor)
    }

    pub fn classifications(&self) -> impl Iterator<Item = &TargetClassification> {
        self.engine.classifications()
    }

    /// Actor currently bound to a client handle
    pub fn actor_for_handle(&self, handle: ActorHandle) -> Option<ActorId> {
        self.resolver.lookup_handle(handle)
    }

    /// Project one actor through the current config
    pub fn render(&self, actor: ActorId) -> Option<RenderDescription> {
        self.classification(actor)
            .map(|c| project(c, &self.config.highlight, self.capabilities))
    }

    /// Projections for every actor that has something to show
    pub fn render_all(&self) -> Vec<RenderDescription> {
        self.classifications()
            .map(|c| project(c, &self.config.highlight, self.capabilities))
            .filter(|desc| !desc.is_empty())
            .collect()
    }

    /// Per-actor state and cast summary for debug views
    pub fn debug_rows(&self) -> Vec<DebugRow> {
        self.classifications()
            .map(|c| {
                let casts = self
                    .engine
                    .casts_on(c.actor)
                    .map(|(category, caster, elapsed)| {
                        format!("{category} {} {elapsed:.1}s", resolve(caster))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                DebugRow {
                    actor: c.actor,
                    name: resolve(c.name).to_string(),
                    raise: c.raise.label(),
                    dispel: c.dispel.label(),
                    casts,
                }
            })
            .collect()
    }
}

fn log_issues(issues: &[TrackingIssue]) {
    for issue in issues {
        match issue {
            TrackingIssue::StaleCastRecord { .. } | TrackingIssue::MalformedCast { .. } => {
                tracing::warn!(%issue, "Tracking issue");
            }
            TrackingIssue::IdentityUnresolved { .. } => {
                tracing::debug!(%issue, "Skipping actor");
            }
            TrackingIssue::AmbiguousCastTermination { .. } => {
                tracing::trace!(%issue, "Cast ended");
            }
        }
    }
}
