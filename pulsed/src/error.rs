use std::path::PathBuf;

use pulsenet::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{0}")]
    Usage(String),

    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("output: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize: {0}")]
    Json(#[from] serde_json::Error),
}
