use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by document sources.
///
/// Upstream failures of the remote source never show up here: a document
/// that cannot be fetched resolves to `Ok(None)`.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the local store failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A local filename does not follow `YYYY-MM-DD-<slug>.<ext>`.
    #[error("Malformed document filename `{name}`: {reason}")]
    MalformedFilename {
        /// The offending filename.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A document identifier string could not be parsed.
    #[error("Invalid document identifier `{0}`")]
    InvalidId(String),
    /// The source configuration is unusable.
    #[error("Invalid source configuration: {0}")]
    Config(String),
    /// The configuration is not valid JSON for its schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
