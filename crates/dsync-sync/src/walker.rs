//! Walk coordinator
//!
//! Traverses the local tree top-down (a single-threaded producer),
//! prunes ignored subtrees before any remote call, lists each surviving
//! directory remotely exactly once, and fans per-file [`SyncTask`]s out
//! onto a semaphore-bounded `JoinSet`. Task failures are collected into
//! the report, never propagated to siblings.

use std::collections::VecDeque;
use std::path::{Path, MAIN_SEPARATOR};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use dsync_core::config::SyncConfig;
use dsync_core::domain::entry::{LocalFile, RemoteListing, SyncDecision};
use dsync_core::domain::ignore::IgnoreSet;
use dsync_core::domain::report::SyncReport;
use dsync_core::ports::remote_store::RemoteStore;

use crate::compare::FsDigest;
use crate::paths::remote_path;
use crate::task::{SyncContext, SyncTask};

/// Traverses the local tree and drives per-file tasks to completion
pub struct WalkCoordinator {
    ctx: Arc<SyncContext>,
    ignore: IgnoreSet,
    max_concurrent: usize,
}

impl WalkCoordinator {
    /// Builds a coordinator over a shared task context
    #[must_use]
    pub fn new(ctx: Arc<SyncContext>, ignore: IgnoreSet, max_concurrent: usize) -> Self {
        Self {
            ctx,
            ignore,
            max_concurrent,
        }
    }

    /// Walks `local_root` and synchronizes every non-ignored file
    ///
    /// # Errors
    /// Fails only for configuration-class problems (root missing or not
    /// a directory). Listing and per-file transfer errors degrade to
    /// report entries.
    pub async fn run(&self, local_root: &Path) -> Result<SyncReport> {
        let meta = std::fs::metadata(local_root).with_context(|| {
            format!("{} does not exist on your filesystem", local_root.display())
        })?;
        if !meta.is_dir() {
            bail!("{} is not a folder on your filesystem", local_root.display());
        }

        let started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks: JoinSet<(String, Result<SyncDecision>)> = JoinSet::new();
        let mut report = SyncReport::default();
        let mut submitted = 0u32;

        // (absolute dir, subdir relative to root in local separators)
        let mut pending: VecDeque<(std::path::PathBuf, String)> = VecDeque::new();
        pending.push_back((local_root.to_path_buf(), String::new()));

        while let Some((dir, subdir)) = pending.pop_front() {
            debug!(dir = %dir.display(), "Descending");
            let listing = Arc::new(self.list_remote(&subdir).await);

            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Failed to read directory; skipping");
                    continue;
                }
            };

            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(dir = %dir.display(), error = %e, "Unreadable directory entry");
                        continue;
                    }
                };
                let name = entry.file_name().to_string_lossy().into_owned();
                let file_type = match entry.file_type() {
                    Ok(t) => t,
                    Err(e) => {
                        report.record_failure(entry.path().display().to_string(), e.to_string());
                        continue;
                    }
                };

                if file_type.is_dir() {
                    if self.ignore.matches(&name) {
                        debug!(dir = %entry.path().display(), "Pruning ignored directory");
                        continue;
                    }
                    let child_subdir = if subdir.is_empty() {
                        name
                    } else {
                        format!("{subdir}{MAIN_SEPARATOR}{name}")
                    };
                    pending.push_back((entry.path(), child_subdir));
                    continue;
                }
                if self.ignore.matches(&name) {
                    info!(path = %entry.path().display(), "Ignoring");
                    continue;
                }

                // Stat through symlinks: a link to a regular file syncs
                // its target's bytes. Links to directories stay
                // undescended (the is_dir branch above never follows).
                let meta = match std::fs::metadata(entry.path()) {
                    Ok(meta) => meta,
                    Err(e) => {
                        report.record_failure(entry.path().display().to_string(), e.to_string());
                        continue;
                    }
                };
                if !meta.is_file() {
                    debug!(path = %entry.path().display(), "Skipping non-regular file");
                    continue;
                }

                let local = match meta.modified() {
                    Ok(mtime) => {
                        LocalFile::new(entry.path(), subdir.clone(), &name, meta.len(), mtime)
                    }
                    Err(e) => {
                        report.record_failure(entry.path().display().to_string(), e.to_string());
                        continue;
                    }
                };

                let display = local.path.display().to_string();
                let task = SyncTask::new(self.ctx.clone(), local, listing.clone());
                let permits = semaphore.clone();
                submitted += 1;
                tasks.spawn(async move {
                    let _permit = match permits.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => return (display, Err(anyhow::anyhow!("Worker pool closed: {e}"))),
                    };
                    (display, task.run().await)
                });
            }
        }

        info!(submitted, "Walk complete; waiting for transfers");

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(decision))) => report.record(decision),
                Ok((path, Err(e))) => {
                    error!(path = %path, error = format!("{e:#}"), "File failed to sync");
                    report.record_failure(path, format!("{e:#}"));
                }
                Err(e) => {
                    // A panicked task still only costs that one file
                    error!(error = %e, "Sync task panicked");
                    report.record_failure("<unknown>", e.to_string());
                }
            }
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            created = report.created,
            overwritten = report.overwritten,
            skipped = report.skipped,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "Synchronization finished"
        );
        Ok(report)
    }

    /// Lists one remote directory, degrading any failure to empty
    async fn list_remote(&self, subdir: &str) -> RemoteListing {
        let path = match remote_path(&self.ctx.destination, subdir, "") {
            Ok(path) => path,
            Err(e) => {
                warn!(subdir, error = %e, "Unmappable remote directory; assumed empty");
                return RemoteListing::empty();
            }
        };
        match self.ctx.store.list_folder(&path).await {
            Ok(listing) => {
                debug!(path = %path, entries = listing.len(), "Remote listing fetched");
                listing
            }
            Err(e) => {
                warn!(path = %path, error = format!("{e:#}"), "Folder listing failed; assumed empty");
                RemoteListing::empty()
            }
        }
    }
}

/// Synchronizes `local_root` into the remote destination
///
/// The single entry point the CLI drives: resolves the destination name
/// (config override, else the root's base name), wires the production
/// digest source, and runs the coordinator.
pub async fn synchronize(
    store: Arc<dyn RemoteStore>,
    config: &SyncConfig,
    local_root: &Path,
    dryrun: bool,
    ignore: IgnoreSet,
) -> Result<SyncReport> {
    let destination = match &config.destination {
        Some(name) => name.clone(),
        None => local_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| {
                format!(
                    "Cannot derive a destination name from {}",
                    local_root.display()
                )
            })?,
    };

    info!(
        root = %local_root.display(),
        destination,
        dryrun,
        chunk_size = config.chunk_size_bytes(),
        "Starting synchronization"
    );

    let ctx = Arc::new(SyncContext {
        store,
        digest: Arc::new(FsDigest),
        destination,
        chunk_size: config.chunk_size_bytes(),
        dryrun,
    });
    WalkCoordinator::new(ctx, ignore, config.max_concurrent as usize)
        .run(local_root)
        .await
}
