//! Upload transfer paths
//!
//! Small payloads go up in one direct call carrying commit metadata.
//! Payloads at or above the configured chunk size run through
//! [`ChunkedUploadSession`], the start/append/finish state machine with
//! a monotonically advancing byte cursor. Session round trips are
//! bounded by `2 * ceil(size / chunk_size)`; crossing that bound fails
//! the file instead of looping.

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info};

use dsync_core::domain::entry::{LocalFile, RemoteEntry};
use dsync_core::domain::newtypes::SessionId;
use dsync_core::ports::remote_store::{CommitInfo, RemoteStore};

/// Per-file transfer failures with protocol meaning
#[derive(Debug, Error)]
pub enum TransferError {
    /// The session issued more round trips than the protocol bound allows
    #[error(
        "Upload session for {path} exceeded its round-trip bound \
         ({round_trips} of {limit} allowed)"
    )]
    ProtocolBound {
        /// Destination remote path
        path: String,
        /// Round trips issued when the bound tripped
        round_trips: u64,
        /// The computed bound
        limit: u64,
    },

    /// The local file ended before the expected byte count
    ///
    /// Happens when a file is truncated between stat and read; the
    /// session cannot commit a payload of the announced size.
    #[error("Local file for {path} ended early: read {got} of {expected} bytes")]
    ShortRead {
        /// Destination remote path
        path: String,
        /// Bytes actually read
        got: u64,
        /// Bytes the stat promised
        expected: u64,
    },
}

// ============================================================================
// ChunkedUploadSession
// ============================================================================

/// States of one chunked upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No network call issued yet
    NotStarted,
    /// First chunk sent, session id assigned
    Started,
    /// At least one append committed
    Appending,
    /// Finish call committed the whole payload
    Finished,
    /// A call failed or a protocol invariant tripped
    Failed,
}

/// Drives one file's start/append/finish upload session
///
/// Owns the session cursor exclusively for the duration of one file's
/// transfer; never reused across files. Chunk reads and appends are
/// strictly ordered, no parallel chunk upload within a session.
pub struct ChunkedUploadSession<'a> {
    store: &'a dyn RemoteStore,
    commit: &'a CommitInfo,
    chunk_size: u64,
    total_size: u64,
    /// Bytes committed to the remote so far; monotonically non-decreasing
    cursor: u64,
    state: SessionState,
    session_id: Option<SessionId>,
    round_trips: u64,
    limit: u64,
}

impl<'a> ChunkedUploadSession<'a> {
    /// Prepares a session for a payload of `total_size` bytes
    #[must_use]
    pub fn new(
        store: &'a dyn RemoteStore,
        commit: &'a CommitInfo,
        chunk_size: u64,
        total_size: u64,
    ) -> Self {
        let limit = 2 * total_size.div_ceil(chunk_size);
        Self {
            store,
            commit,
            chunk_size,
            total_size,
            cursor: 0,
            state: SessionState::NotStarted,
            session_id: None,
            round_trips: 0,
            limit,
        }
    }

    /// Current state, observable after [`run`](Self::run) returns
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Bytes committed so far
    #[must_use]
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Runs the session to completion against `reader`
    pub async fn run<R>(&mut self, reader: &mut R) -> Result<RemoteEntry>
    where
        R: AsyncRead + Unpin + Send,
    {
        let result = self.drive(reader).await;
        if result.is_err() {
            self.state = SessionState::Failed;
        }
        result
    }

    async fn drive<R>(&mut self, reader: &mut R) -> Result<RemoteEntry>
    where
        R: AsyncRead + Unpin + Send,
    {
        // NotStarted -> Started: first chunk opens the session
        let first = self.read_chunk(reader, self.chunk_size.min(self.total_size)).await?;
        let first_len = first.len() as u64;
        self.charge_round_trip()?;
        let session_id = self
            .store
            .upload_session_start(first)
            .await
            .with_context(|| format!("Failed to start upload session for {}", self.commit.path))?;
        debug!(session = %session_id, path = %self.commit.path, "Upload session started");
        self.cursor += first_len;
        self.state = SessionState::Started;
        self.session_id = Some(session_id.clone());

        loop {
            let remaining = self.total_size - self.cursor;

            if remaining > self.chunk_size {
                // Started/Appending -> Appending
                let chunk = self.read_chunk(reader, self.chunk_size).await?;
                let chunk_len = chunk.len() as u64;
                self.charge_round_trip()?;
                self.store
                    .upload_session_append(chunk, &session_id, self.cursor)
                    .await
                    .with_context(|| {
                        format!(
                            "Failed to append at offset {} for {}",
                            self.cursor, self.commit.path
                        )
                    })?;
                debug!(
                    path = %self.commit.path,
                    offset = self.cursor,
                    len = chunk_len,
                    "Appended chunk"
                );
                self.cursor += chunk_len;
                self.state = SessionState::Appending;
            } else {
                // Appending -> Finished: final chunk rides the commit
                let chunk = self.read_chunk(reader, remaining).await?;
                self.charge_round_trip()?;
                let entry = self
                    .store
                    .upload_session_finish(chunk, &session_id, self.cursor, self.commit)
                    .await
                    .with_context(|| {
                        format!("Failed to finish upload session for {}", self.commit.path)
                    })?;
                self.cursor = self.total_size;
                self.state = SessionState::Finished;
                info!(
                    path = %self.commit.path,
                    size = self.total_size,
                    round_trips = self.round_trips,
                    "Upload session committed"
                );
                return Ok(entry);
            }
        }
    }

    /// Counts one network round trip against the protocol bound
    ///
    /// The drive loop issues exactly `ceil(total_size / chunk_size)`
    /// calls (plus one for a single-chunk payload's empty finish),
    /// strictly under the `2x` limit; tripping the bound means the loop
    /// stopped making forward progress.
    fn charge_round_trip(&mut self) -> Result<(), TransferError> {
        self.round_trips += 1;
        if self.round_trips > self.limit {
            return Err(TransferError::ProtocolBound {
                path: self.commit.path.to_string(),
                round_trips: self.round_trips,
                limit: self.limit,
            });
        }
        Ok(())
    }

    /// Reads exactly `want` bytes, failing on early EOF
    async fn read_chunk<R>(&self, reader: &mut R, want: u64) -> Result<Vec<u8>>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut buf = vec![0u8; want as usize];
        let mut filled = 0usize;
        while filled < buf.len() {
            let n = reader
                .read(&mut buf[filled..])
                .await
                .with_context(|| format!("Failed to read chunk for {}", self.commit.path))?;
            if n == 0 {
                return Err(TransferError::ShortRead {
                    path: self.commit.path.to_string(),
                    got: self.cursor + filled as u64,
                    expected: self.total_size,
                }
                .into());
            }
            filled += n;
        }
        Ok(buf)
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Uploads one local file, choosing the direct or chunked path
///
/// Files below `chunk_size` bytes go up in a single `upload` call;
/// everything else runs a chunked session.
pub async fn upload_file(
    store: &dyn RemoteStore,
    local: &LocalFile,
    commit: &CommitInfo,
    chunk_size: u64,
) -> Result<RemoteEntry> {
    if local.size < chunk_size {
        let data = tokio::fs::read(&local.path)
            .await
            .with_context(|| format!("Failed to read {}", local.path.display()))?;
        debug!(path = %commit.path, size = local.size, "Direct upload");
        return store
            .upload(data, commit)
            .await
            .with_context(|| format!("Failed to upload {}", commit.path));
    }

    let mut file = tokio::fs::File::open(&local.path)
        .await
        .with_context(|| format!("Failed to open {}", local.path.display()))?;
    let mut session = ChunkedUploadSession::new(store, commit, chunk_size, local.size);
    session.run(&mut file).await
}
