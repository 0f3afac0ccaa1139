use chrono::NaiveDateTime;
use rezwatch_core::context::{AppConfig, AppConfigExt};
use rezwatch_core::observer::ScriptedSource;
use rezwatch_core::pipeline::{HighlightPipeline, TrackerConfig};

/// Frame time used when ticking without a scenario (synthetic mode)
pub const IDLE_TICK_MS: i64 = 16;

/// Holds all state for one CLI session.
pub struct CliContext {
    /// Persisted settings as last loaded or saved
    pub config: AppConfig,
    pub pipeline: HighlightPipeline,
    /// The loaded scenario. None until `load` succeeds.
    pub source: Option<ScriptedSource>,
    /// Clock for ticks that have no scenario behind them
    pub idle_clock: NaiveDateTime,
}

impl CliContext {
    pub fn new() -> Self {
        let config = AppConfig::load_or_default();
        let pipeline = HighlightPipeline::new(TrackerConfig::from_app_config(
            &config,
            std::iter::empty(),
        ));
        Self {
            config,
            pipeline,
            source: None,
            idle_clock: NaiveDateTime::default(),
        }
    }

    /// Settings as they will be after the next tick
    pub fn latest_app_config(&self) -> AppConfig {
        self.pipeline.latest_config().to_app_config()
    }

    pub fn advance_idle_clock(&mut self) -> NaiveDateTime {
        self.idle_clock += chrono::Duration::milliseconds(IDLE_TICK_MS);
        self.idle_clock
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}
