mod config;
mod error;
mod interner;

pub use config::{
    AppConfig, AppConfigExt, Color, HighlightConfig, MAX_ICON_SCALE, MIN_ICON_SCALE, RectType,
    TrackingSettings, highlight_colors,
};
pub use error::ConfigError;
pub use interner::{IStr, empty_istr, intern, join_names, resolve, resolve_all};
