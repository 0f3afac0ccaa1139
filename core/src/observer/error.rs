//! Error types for scenario loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading a scripted scenario file
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid scenario in {path}: {reason}")]
    InvalidScenario { path: PathBuf, reason: String },
}
