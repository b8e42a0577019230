//! Domain error types

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid remote path format
    #[error("Invalid remote path: {0}")]
    InvalidRemotePath(String),

    /// Invalid content hash format (expected 64 lowercase hex chars)
    #[error("Invalid content hash: {0}")]
    InvalidHash(String),

    /// Invalid upload session identifier
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    /// Ignore file could not be read or parsed
    #[error("Failed to load ignore file {path}: {reason}")]
    IgnoreFile {
        /// Path to the offending file
        path: String,
        /// Underlying failure description
        reason: String,
    },
}
