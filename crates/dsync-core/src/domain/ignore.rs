//! Ignore rules
//!
//! An [`IgnoreSet`] is an immutable set of path segments loaded once at
//! startup. A file is excluded when its own name or any ancestor
//! directory name matches a segment exactly (case-sensitive). The set is
//! passed explicitly into the walker rather than living in shared state.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::errors::DomainError;

/// Immutable set of ignored path segments
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    segments: HashSet<String>,
}

impl IgnoreSet {
    /// Creates an empty set (nothing ignored)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads segments from a plain text file, one per line
    ///
    /// Blank lines and lines starting with `#` are skipped; surrounding
    /// whitespace is trimmed.
    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let text = fs::read_to_string(path).map_err(|e| DomainError::IgnoreFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(text.lines().collect())
    }

    /// True if the single segment is ignored
    #[must_use]
    pub fn matches(&self, segment: &str) -> bool {
        self.segments.contains(segment)
    }

    /// True if any component of `relative` is ignored
    #[must_use]
    pub fn matches_path(&self, relative: &Path) -> bool {
        relative
            .components()
            .any(|c| self.matches(&c.as_os_str().to_string_lossy()))
    }

    /// Number of segments in the set
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when no segments are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let segments = iter
            .into_iter()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(String::from)
            .collect();
        Self { segments }
    }
}
