use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Per-file problems are not errors at this level; they are logged and
/// counted in the run summary.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A declared input root does not exist
    #[error("{kind} directory not found: {}", path.display())]
    MissingRoot { kind: &'static str, path: PathBuf },

    /// Reading a source or writing an output failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serializing an output document failed
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A settings file exists but cannot be used
    #[error("Settings error in {path}: {message}")]
    Settings { path: String, message: String },
}

impl PipelineError {
    pub fn missing_root(kind: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::MissingRoot {
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

    pub fn settings(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Settings {
            path: path.into(),
            message: message.into(),
        }
    }
}
