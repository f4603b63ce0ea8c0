use thiserror::Error;

/// Errors that make a single export file unusable.
///
/// None of these abort a run: callers log the error and move on to the
/// next file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Read failed: {path} ({source})")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON parse failed: {path} ({source})")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    /// The document root is not a non-empty array of blocks
    #[error("Unexpected JSON root: {0}")]
    UnexpectedRoot(String),

    /// No block satisfied the primary-record strategy
    #[error("No primary record: {0}")]
    NoPrimaryRecord(String),
}
