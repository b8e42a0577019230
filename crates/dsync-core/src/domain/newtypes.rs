//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for values that cross the port boundary.
//! Each newtype validates at construction time so the engine never has
//! to re-check path or hash shape mid-flight.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// RemotePath
// ============================================================================

/// A canonical path in the remote namespace
///
/// Invariants: begins with exactly one `/`, contains no empty segments
/// (no `//` runs), and never carries a trailing slash. The path mapper
/// in the sync engine produces values satisfying these rules; this type
/// enforces them for anything else (tests, ad-hoc callers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemotePath(String);

impl RemotePath {
    /// Creates a `RemotePath`, validating the canonical-form invariants
    pub fn new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(DomainError::InvalidRemotePath(format!(
                "{path} does not start with /"
            )));
        }
        if path.len() > 1 && path.ends_with('/') {
            return Err(DomainError::InvalidRemotePath(format!(
                "{path} has a trailing slash"
            )));
        }
        if path == "/" || path.contains("//") {
            return Err(DomainError::InvalidRemotePath(path));
        }
        Ok(Self(path))
    }

    /// Returns the path as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a child path with `name` appended as one more segment
    pub fn join(&self, name: &str) -> Result<Self, DomainError> {
        Self::new(format!("{}/{}", self.0, name))
    }
}

impl Display for RemotePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemotePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// ContentHash
// ============================================================================

/// A Dropbox content hash: 64 lowercase hex characters
///
/// This is the hex encoding of the final SHA-256 in the block-chunked
/// scheme implemented by [`crate::hash::ContentHasher`]. Comparing two
/// `ContentHash` values is the authoritative "same content" check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Creates a `ContentHash` from its hex representation
    pub fn new(hex: impl Into<String>) -> Result<Self, DomainError> {
        let hex = hex.into();
        if hex.len() != 64 || !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(DomainError::InvalidHash(hex));
        }
        Ok(Self(hex))
    }

    /// Wraps a digest the hasher just produced; the caller guarantees
    /// it is already 64 lowercase hex characters
    pub(crate) fn from_digest(hex: String) -> Self {
        debug_assert!(hex.len() == 64);
        Self(hex)
    }

    /// Returns the hex digest as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// SessionId
// ============================================================================

/// Opaque identifier for a chunked upload session, assigned by the remote
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a `SessionId`; rejects empty strings
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidSessionId("empty".to_string()));
        }
        Ok(Self(id))
    }

    /// Returns the raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
