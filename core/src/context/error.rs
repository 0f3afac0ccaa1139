//! Error types for configuration persistence

use std::path::PathBuf;
use thiserror::Error;

/// Errors during configuration load/save
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[source] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("failed to load configuration from {path}")]
    LoadPath {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },

    #[error("failed to save configuration to {path}")]
    SavePath {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },

    #[error("failed to locate configuration file")]
    Locate(#[source] confy::ConfyError),
}
