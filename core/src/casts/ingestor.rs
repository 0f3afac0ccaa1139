//! Snapshot diffing for active casts
//!
//! The source only ever says "these casts are in progress right now". The
//! ingestor remembers the previous tick's records and turns each new
//! snapshot into Started / Progressed / Ended events.

use chrono::NaiveDateTime;
use hashbrown::{HashMap, HashSet};

use crate::error::TrackingIssue;
use crate::identity::ActorId;

use super::{CastEvent, CastKey, CastRecord, EndReason, ObservedCast};

/// Events and issues produced by one ingest pass
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub events: Vec<CastEvent>,
    pub issues: Vec<TrackingIssue>,
}

#[derive(Debug)]
pub struct CastIngestor {
    records: HashMap<CastKey, CastRecord>,
    next_seq: u64,
    stale_after: chrono::Duration,
}

impl CastIngestor {
    pub fn new(stale_cast_secs: f32) -> Self {
        Self {
            records: HashMap::new(),
            next_seq: 0,
            stale_after: stale_duration(stale_cast_secs),
        }
    }

    pub fn set_stale_cast_secs(&mut self, secs: f32) {
        self.stale_after = stale_duration(secs);
    }

    /// Records currently considered live (stale ones excluded)
    pub fn records(&self) -> impl Iterator<Item = &CastRecord> {
        self.records.values().filter(|r| !r.stale)
    }

    pub fn active_count(&self) -> usize {
        self.records().count()
    }

    /// Diff this tick's casts against the previous tick.
    pub fn ingest(&mut self, casts: &[ObservedCast], now: NaiveDateTime) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();
        let mut seen: HashSet<CastKey> = HashSet::with_capacity(casts.len());

        for cast in casts {
            if !seen.insert(cast.key) {
                tracing::debug!(
                    caster = %cast.key.caster,
                    target = %cast.key.target,
                    category = %cast.key.category,
                    "Duplicate cast in snapshot, keeping first"
                );
                continue;
            }

            let Some(record) = self.records.get_mut(&cast.key) else {
                let record = CastRecord::new(cast, self.next_seq, now);
                self.next_seq += 1;
                outcome.events.push(started_event(&record, false));
                self.records.insert(cast.key, record);
                continue;
            };

            if record.is_replaced_by(cast) {
                tracing::debug!(
                    caster = %cast.key.caster,
                    target = %cast.key.target,
                    old_elapsed = record.elapsed,
                    new_elapsed = cast.elapsed,
                    old_total = record.total,
                    new_total = cast.total,
                    "Cast replaced under the same ids, restarting"
                );
                *record = CastRecord::new(cast, self.next_seq, now);
                self.next_seq += 1;
                outcome.events.push(started_event(record, true));
                continue;
            }

            if cast.elapsed > record.elapsed {
                record.elapsed = cast.elapsed;
                record.last_progress_at = now;
                if record.stale {
                    // Came back to life: treat as a fresh cast
                    record.stale = false;
                    record.seq = self.next_seq;
                    record.started_at = now;
                    self.next_seq += 1;
                    outcome.events.push(started_event(record, true));
                } else {
                    outcome.events.push(CastEvent::Progressed {
                        key: cast.key,
                        elapsed: cast.elapsed,
                        total: cast.total,
                    });
                }
                continue;
            }

            if !record.stale && now - record.last_progress_at > self.stale_after {
                record.stale = true;
                outcome.issues.push(TrackingIssue::StaleCastRecord {
                    caster: cast.key.caster,
                    target: cast.key.target,
                    category: cast.key.category,
                    idle_secs: record.idle_secs(now),
                });
                outcome.events.push(CastEvent::Ended {
                    key: cast.key,
                    reason: EndReason::Stale,
                });
            }
        }

        let gone: Vec<CastKey> = self
            .records
            .keys()
            .filter(|key| !seen.contains(*key))
            .copied()
            .collect();
        for key in gone {
            let Some(record) = self.records.remove(&key) else {
                continue;
            };
            if record.stale {
                continue;
            }
            outcome.issues.push(TrackingIssue::AmbiguousCastTermination {
                caster: key.caster,
                target: key.target,
                category: key.category,
            });
            outcome.events.push(CastEvent::Ended {
                key,
                reason: EndReason::Disappeared,
            });
        }

        outcome
    }

    /// Drop every record involving `actor`
    pub fn forget_actor(&mut self, actor: ActorId) -> Vec<CastEvent> {
        let mut events = Vec::new();
        self.records.retain(|key, record| {
            let involved = key.caster == actor || key.target == actor;
            if involved && !record.stale {
                events.push(CastEvent::Ended {
                    key: *key,
                    reason: EndReason::Forgotten,
                });
            }
            !involved
        });
        events
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

fn stale_duration(secs: f32) -> chrono::Duration {
    let secs = if secs.is_finite() && secs > 0.0 { secs } else { 5.0 };
    chrono::Duration::milliseconds((secs * 1000.0) as i64)
}

fn started_event(record: &CastRecord, restarted: bool) -> CastEvent {
    CastEvent::Started {
        key: record.key,
        caster_name: record.caster_name,
        seq: record.seq,
        started_at: record.started_at,
        elapsed: record.elapsed,
        total: record.total,
        restarted,
    }
}
