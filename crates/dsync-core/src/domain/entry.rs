//! Local and remote file entities
//!
//! [`LocalFile`] is a point-in-time snapshot of one file on disk;
//! [`RemoteEntry`] and [`RemoteListing`] mirror what the remote store
//! reports for one directory. Both sides normalize file names to
//! Unicode NFC so listing lookups are exact-match.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::newtypes::ContentHash;

/// Normalizes a file name to Unicode NFC
///
/// Dropbox stores names in NFC; macOS filesystems hand out NFD. Both
/// [`LocalFile`] names and [`RemoteListing`] keys go through this so
/// the same logical name always compares equal.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.nfc().collect()
}

/// Truncates a filesystem mtime to whole-second UTC granularity
///
/// The remote stores `client_modified` with second precision, so the
/// local side must drop sub-second digits (truncate, never round)
/// before any timestamp comparison.
#[must_use]
pub fn truncate_mtime(mtime: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(mtime).trunc_subsecs(0)
}

// ============================================================================
// LocalFile
// ============================================================================

/// Snapshot of one local file, recomputed on every walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Absolute path on the local filesystem
    pub path: PathBuf,
    /// Path of the containing directory relative to the sync root
    /// (local separator convention, empty for the root itself)
    pub subdir: String,
    /// File name, NFC-normalized
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last-modified time truncated to whole-second UTC
    pub client_modified: DateTime<Utc>,
}

impl LocalFile {
    /// Builds a `LocalFile` from stat data
    ///
    /// Normalizes `name` and truncates `mtime`; `subdir` is kept in the
    /// local separator convention (the path mapper converts later).
    #[must_use]
    pub fn new(
        path: PathBuf,
        subdir: impl Into<String>,
        name: &str,
        size: u64,
        mtime: SystemTime,
    ) -> Self {
        Self {
            path,
            subdir: subdir.into(),
            name: normalize_name(name),
            size,
            client_modified: truncate_mtime(mtime),
        }
    }
}

// ============================================================================
// RemoteEntry / RemoteListing
// ============================================================================

/// One entry in a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteEntry {
    /// A remote file with the metadata needed for sync decisions
    File {
        /// Entry name as reported by the remote
        name: String,
        /// Size in bytes
        size: u64,
        /// Block-chunked content digest
        content_hash: ContentHash,
        /// Client-set modification timestamp (second granularity)
        client_modified: DateTime<Utc>,
    },
    /// A remote folder; carries no sync-relevant metadata
    Folder {
        /// Entry name as reported by the remote
        name: String,
    },
}

impl RemoteEntry {
    /// Returns the entry name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Folder { name } => name,
        }
    }

    /// Returns true for file records
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

/// Contents of one remote directory, keyed by NFC-normalized name
///
/// Built once per directory per run and shared read-only by every
/// sync task for files in that directory. Never cached across runs.
#[derive(Debug, Clone, Default)]
pub struct RemoteListing {
    entries: HashMap<String, RemoteEntry>,
}

impl RemoteListing {
    /// Creates an empty listing (also the recovery value when a remote
    /// listing call fails)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Inserts an entry under its NFC-normalized name
    pub fn insert(&mut self, entry: RemoteEntry) {
        self.entries.insert(normalize_name(entry.name()), entry);
    }

    /// Looks up an entry by NFC-normalized name (exact match)
    #[must_use]
    pub fn get(&self, normalized_name: &str) -> Option<&RemoteEntry> {
        self.entries.get(normalized_name)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the listing has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<RemoteEntry> for RemoteListing {
    fn from_iter<I: IntoIterator<Item = RemoteEntry>>(iter: I) -> Self {
        let mut listing = Self::empty();
        for entry in iter {
            listing.insert(entry);
        }
        listing
    }
}

// ============================================================================
// SyncDecision / WriteMode
// ============================================================================

/// Per-file outcome of the walk/diff decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDecision {
    /// Local and remote already agree; no transfer
    Skip,
    /// No remote counterpart; upload in non-overwrite mode
    CreateNew,
    /// Remote counterpart differs; upload in overwrite mode
    Overwrite,
}

impl Display for SyncDecision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Skip => "skip",
            Self::CreateNew => "create",
            Self::Overwrite => "overwrite",
        };
        write!(f, "{s}")
    }
}

/// Commit mode handed to the remote store on upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Create; the remote autorenames on conflict
    Add,
    /// Replace the remote content unconditionally
    Overwrite,
}
