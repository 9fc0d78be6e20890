use std::io;

use thiserror::Error;

/// Adapter errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The state file parsed, but its top level is not an object
    #[error("State file is not a JSON object")]
    NotAnObject,
}

pub type StoreResult<T> = Result<T, StoreError>;
