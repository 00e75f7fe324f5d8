use std::time::Duration;

use thiserror::Error;

/// Unified error type for wlanvault
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("command unavailable: {0}")]
    CommandUnavailable(String),

    #[error("command timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed profile export: {0}")]
    MalformedExport(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type VaultResult<T> = Result<T, VaultError>;
