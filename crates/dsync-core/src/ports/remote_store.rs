//! Remote object-storage port (driven/secondary port)
//!
//! The sync engine talks to exactly one remote capability: the six
//! operations below. The production implementation lives in the
//! `dsync-dropbox` adapter; tests swap in an in-memory recording
//! variant, which keeps the engine deterministic without network calls.
//!
//! ## Design Notes
//!
//! - `anyhow::Result` at the boundary, adapter errors don't need
//!   domain-level classification.
//! - `list_folder` errors are *not* interpreted here; the engine maps
//!   any listing failure to an empty listing and keeps going.
//! - `download` returns `None` for a missing remote file rather than
//!   an error, since "not there yet" is an expected answer.

use chrono::{DateTime, Utc};

use crate::domain::entry::{RemoteEntry, RemoteListing, WriteMode};
use crate::domain::newtypes::{RemotePath, SessionId};

/// Commit metadata for an upload (direct or session finish)
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// Destination path in the remote namespace
    pub path: RemotePath,
    /// Create vs overwrite semantics
    pub mode: WriteMode,
    /// Rename on conflict instead of failing
    pub autorename: bool,
    /// Client-observed modification time, second granularity
    pub client_modified: Option<DateTime<Utc>>,
}

impl CommitInfo {
    /// Builds commit metadata with autorename enabled (the engine's
    /// default for every upload)
    #[must_use]
    pub fn new(path: RemotePath, mode: WriteMode, client_modified: Option<DateTime<Utc>>) -> Self {
        Self {
            path,
            mode,
            autorename: true,
            client_modified,
        }
    }
}

/// Port trait for the remote object store
///
/// One network round trip per method call. Implementations own
/// serialization of concurrent calls, timeouts, and retries; the engine
/// never reorders calls within one file's chunked session.
#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    /// Lists one remote directory
    ///
    /// # Errors
    /// Returns an error for a missing directory or any API failure; the
    /// engine treats both as an empty listing.
    async fn list_folder(&self, path: &RemotePath) -> anyhow::Result<RemoteListing>;

    /// Uploads a whole file in a single request
    async fn upload(&self, data: Vec<u8>, commit: &CommitInfo) -> anyhow::Result<RemoteEntry>;

    /// Starts a chunked upload session with the first chunk
    ///
    /// # Returns
    /// The opaque session identifier assigned by the remote
    async fn upload_session_start(&self, data: Vec<u8>) -> anyhow::Result<SessionId>;

    /// Appends one chunk at the given cursor offset
    async fn upload_session_append(
        &self,
        data: Vec<u8>,
        session_id: &SessionId,
        offset: u64,
    ) -> anyhow::Result<()>;

    /// Finishes a session with the final chunk, committing atomically
    async fn upload_session_finish(
        &self,
        data: Vec<u8>,
        session_id: &SessionId,
        offset: u64,
        commit: &CommitInfo,
    ) -> anyhow::Result<RemoteEntry>;

    /// Downloads a remote file's bytes, `None` if it does not exist
    async fn download(&self, path: &RemotePath) -> anyhow::Result<Option<Vec<u8>>>;
}
