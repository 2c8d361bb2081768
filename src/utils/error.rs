use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the edges of the crate: reading input text, loading rule
/// tables and parsing user-supplied document type names. Classification and
/// extraction themselves never fail.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error reading {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdinError(#[from] std::io::Error),

    #[error("Rules format error: {0}")]
    RulesFormatError(#[from] serde_json::Error),

    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl DocumentError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocumentError::IoError {
            path: path.into(),
            source,
        }
    }
}
