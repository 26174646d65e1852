//! Error taxonomy
//!
//! Placement exhaustion is not an error (callers get `None`), and missing
//! fixtures after a load are reconciled silently. Only snapshot and settings
//! storage can fail, and a failure never touches the live scene.

use thiserror::Error;

/// Failure to read, write, or interpret a scene snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Input was not valid snapshot JSON.
    #[error("snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Input parsed but is semantically unusable.
    #[error("invalid snapshot: {0}")]
    Invalid(String),
    /// Local snapshot file could not be read or written.
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    /// Browser storage rejected the operation.
    #[error("storage error: {0}")]
    Storage(String),
    /// No snapshot has been saved yet.
    #[error("no saved snapshot found")]
    NotFound,
}
