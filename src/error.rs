use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// File-level failures. Any of these ends the run with exit code 1.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
