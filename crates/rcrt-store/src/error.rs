use std::path::PathBuf;

use rcrt_types::TypeError;

/// Errors from entry store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `create` was pointed at a path that already exists.
    #[error("store already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// The metadata file is missing or cannot be decoded.
    #[error("corrupt store at {}: {reason}", .path.display())]
    CorruptStore { path: PathBuf, reason: String },

    /// A metadata update named an id that is not in the store.
    #[error("unknown entry id: {0}")]
    UnknownKey(String),

    /// A supplied entry record is not a valid entry.
    #[error("invalid record for {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    /// A content path is malformed or resolves outside the store root.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// Article text points at ids that do not exist in the store.
    #[error("{file} references unknown entries: {}", .missing.join(", "))]
    DanglingReference { file: String, missing: Vec<String> },

    /// Identifier errors, including an exhausted retry budget.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store-internal failure (e.g. a poisoned write lock).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
