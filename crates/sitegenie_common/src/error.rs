//! Error types for SiteGenie.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the durable message log
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing file could not be created, opened, read or written
    #[error("Storage unavailable at {}: {reason}", .path.display())]
    StorageUnavailable { path: PathBuf, reason: String },

    /// A stored row carries a role this build does not know
    #[error("Stored turn {id} has unknown role '{role}'")]
    CorruptTurn { id: i64, role: String },
}

impl StoreError {
    pub(crate) fn unavailable(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        StoreError::StorageUnavailable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

/// Failures of the hosted model call. Each one is scoped to a single turn.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("No API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Model API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}
