pub mod casts;
pub mod classify;
pub mod context;
pub mod error;
pub mod game_data;
pub mod identity;
pub mod observer;
pub mod pipeline;
pub mod render;
pub mod status;


// Re-exports for convenience
pub use casts::{CastCategory, CastEvent, CastEventHandler, CastIngestor, EndReason};
pub use classify::{ClassificationEngine, DispelState, RaiseState, TargetClassification};
pub use context::{AppConfig, AppConfigExt, ConfigError, HighlightConfig, RectType};
pub use error::TrackingIssue;
pub use identity::{ActorId, IdentityResolver};
pub use observer::{
    ActiveCast, Capabilities, CharacterIdentity, GameStateSource, GroupKind, ObservationMode,
    ObservationSnapshot, Scenario, ScenarioError, ScriptedSource, SyntheticState, WatchedActor,
};
pub use pipeline::{DebugRow, HighlightPipeline, TickReport, TrackerConfig};
pub use render::{Highlight, RenderDescription, project};
pub use status::{StatusEntry, StatusList, StatusSet};
