use std::path::PathBuf;

use dwe_lib::PipelineError;
use thiserror::Error;

/// Errors from asset-tree maintenance.
#[derive(Debug, Error)]
pub enum AssetError {
    /// A required input file or directory does not exist
    #[error("{kind} not found: {}", path.display())]
    NotFound { kind: &'static str, path: PathBuf },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A document that must be readable is not valid JSON
    #[error("JSON parse failed: {} ({source})", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl AssetError {
    pub fn not_found(kind: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            kind,
            path: path.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
