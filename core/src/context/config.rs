//! Application configuration
//!
//! Re-exports the shared config types from rezwatch-types and adds
//! confy-backed persistence. The tracking engine never reads these files
//! itself; it is handed a `TrackerConfig` snapshot built from them.

use std::path::{Path, PathBuf};

pub use rezwatch_types::{
    AppConfig, Color, HighlightConfig, MAX_ICON_SCALE, MIN_ICON_SCALE, RectType,
    TrackingSettings, highlight_colors,
};

use super::error::ConfigError;

const APP_NAME: &str = "rezwatch";
const CONFIG_NAME: &str = "config";

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    /// Load from the platform config directory
    fn load() -> Result<Self, ConfigError>;
    /// Load, falling back to defaults (and logging) on any error
    fn load_or_default() -> Self;
    /// Load from an explicit path
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Result<Self, ConfigError> {
        confy::load(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)
    }

    fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Using default configuration");
                Self::default()
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        confy::load_path(path).map_err(|source| ConfigError::LoadPath {
            path: path.to_path_buf(),
            source,
        })
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(|source| ConfigError::SavePath {
            path: path.to_path_buf(),
            source,
        })
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Locate)
    }
}
