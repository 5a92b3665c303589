//! Error types for splitbill core.

use thiserror::Error;

/// Errors from persistence and export. Calculations never fail.
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Saved data is not valid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid storage key '{key}': use letters, digits, '.', '_' or '-'")]
    InvalidKey { key: String },
}

pub type Result<T> = std::result::Result<T, SplitError>;
