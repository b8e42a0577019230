//! Per-file sync task
//!
//! One [`SyncTask`] decides and (unless dry-running) transfers exactly
//! one local file. The remote listing for its directory is supplied by
//! the walker; the task itself issues at most one upload and no listing
//! calls.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use dsync_core::domain::entry::{LocalFile, RemoteListing, SyncDecision, WriteMode};
use dsync_core::ports::remote_store::{CommitInfo, RemoteStore};

use crate::compare::{is_synced, FileDigest};
use crate::paths::remote_path;
use crate::transfer::upload_file;

/// Shared, read-only context for every task in one run
pub struct SyncContext {
    /// Remote store handle
    pub store: Arc<dyn RemoteStore>,
    /// Content digest capability for the comparator's slow path
    pub digest: Arc<dyn FileDigest>,
    /// Remote destination root folder name
    pub destination: String,
    /// Upload chunk size in bytes
    pub chunk_size: u64,
    /// When set, decisions are computed and reported but nothing uploads
    pub dryrun: bool,
}

/// Decision-and-transfer unit for one local file
pub struct SyncTask {
    ctx: Arc<SyncContext>,
    local: LocalFile,
    listing: Arc<RemoteListing>,
}

impl SyncTask {
    /// Pairs one local file with its directory's shared remote listing
    #[must_use]
    pub fn new(ctx: Arc<SyncContext>, local: LocalFile, listing: Arc<RemoteListing>) -> Self {
        Self {
            ctx,
            local,
            listing,
        }
    }

    /// Decides skip/create/overwrite and performs the upload if needed
    ///
    /// Failures are returned to the coordinator, which attributes them
    /// to this file only; sibling tasks are unaffected.
    pub async fn run(self) -> Result<SyncDecision> {
        // LocalFile names are NFC-normalized at construction, matching
        // the listing's keys
        let decision = match self.listing.get(&self.local.name) {
            None => SyncDecision::CreateNew,
            Some(remote) => {
                if is_synced(&self.local, remote, self.ctx.digest.as_ref()).await? {
                    SyncDecision::Skip
                } else {
                    SyncDecision::Overwrite
                }
            }
        };

        let mode = match decision {
            SyncDecision::Skip => {
                debug!(path = %self.local.path.display(), "Already synced");
                return Ok(decision);
            }
            SyncDecision::CreateNew => WriteMode::Add,
            SyncDecision::Overwrite => WriteMode::Overwrite,
        };
        let target = remote_path(&self.ctx.destination, &self.local.subdir, &self.local.name)?;
        let commit = CommitInfo::new(target, mode, Some(self.local.client_modified));

        if self.ctx.dryrun {
            info!(
                local = %self.local.path.display(),
                remote = %commit.path,
                decision = %decision,
                "Dry run: would upload"
            );
            return Ok(decision);
        }

        upload_file(
            self.ctx.store.as_ref(),
            &self.local,
            &commit,
            self.ctx.chunk_size,
        )
        .await?;
        info!(
            local = %self.local.path.display(),
            remote = %commit.path,
            decision = %decision,
            "Uploaded"
        );
        Ok(decision)
    }
}
