//! Error taxonomy for resolution, storage, and bulk import.

use std::path::PathBuf;

use thiserror::Error;

/// Mapping store failure. Storage problems surface as themselves and are
/// never collapsed into `NotFound` or `NoMatch`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid {field}: must not be blank")]
    InvalidField { field: &'static str },

    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse mapping file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Resolution workflow failure.
///
/// `NotFound` and `NoMatch` are deliberately distinct: the first means the
/// source code should be fixed, the second that a manual mapping may be
/// warranted.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Malformed request input; never retried internally.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The source code is absent from the source catalog (or its row has
    /// no display to score).
    #[error("source code '{0}' not found in source catalog")]
    NotFound(String),

    /// The source code exists but no candidate clears the threshold.
    #[error("no qualifying match for source code '{0}'")]
    NoMatch(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Bulk import failure. Every variant aborts before any mutation.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import batch is empty")]
    EmptyBatch,

    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("duplicate source code in batch: {code}")]
    DuplicateSource { code: String },

    #[error(transparent)]
    Storage(#[from] StoreError),
}
