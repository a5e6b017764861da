use std::path::PathBuf;
use thiserror::Error;

/// Failures at the edges of the engine: loading documents and configuration,
/// parsing user-supplied tokens. Layout itself never fails.
#[derive(Error, Debug)]
pub enum LineageError {
    #[error("Invalid layout direction: {0} (expected TB, BT, LR or RL)")]
    InvalidDirection(String),
    #[error("Invalid layout strategy: {0} (expected auto, tree or layered)")]
    InvalidStrategy(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LineageError {
    /// Read and deserialize a JSON file, tagging failures with the path.
    pub fn read_json<T: serde::de::DeserializeOwned>(
        path: impl Into<PathBuf>,
    ) -> Result<T, LineageError> {
        let path = path.into();
        let raw = std::fs::read_to_string(&path).map_err(|source| LineageError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| LineageError::Parse { path, source })
    }
}
