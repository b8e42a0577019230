//! Local-vs-remote equivalence
//!
//! Two-stage comparison: cheap stat data first (size + whole-second
//! mtime), content digest only when the metadata is inconclusive. The
//! digest computation is behind the [`FileDigest`] trait so engine tests
//! can count how often the slow path actually runs.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::debug;

use dsync_core::domain::entry::{LocalFile, RemoteEntry};
use dsync_core::domain::newtypes::ContentHash;
use dsync_core::hash::{ContentHasher, BLOCK_SIZE};

/// Capability for computing a local file's content digest
#[async_trait::async_trait]
pub trait FileDigest: Send + Sync {
    /// Computes the provider-compatible content hash of the file at `path`
    async fn digest(&self, path: &Path) -> Result<ContentHash>;
}

/// Production digest source: streams the file through [`ContentHasher`]
/// one hash block at a time
#[derive(Debug, Default)]
pub struct FsDigest;

#[async_trait::async_trait]
impl FileDigest for FsDigest {
    async fn digest(&self, path: &Path) -> Result<ContentHash> {
        let mut file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open {} for hashing", path.display()))?;

        let mut hasher = ContentHasher::new();
        let mut buf = vec![0u8; BLOCK_SIZE];
        loop {
            let n = file
                .read(&mut buf)
                .await
                .with_context(|| format!("Failed to read {} while hashing", path.display()))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(hasher.finalize())
    }
}

/// Decides whether `local` already matches `remote`
///
/// Folder entries never satisfy sync. The fast path returns true when
/// remote size and client_modified match the local stat exactly (local
/// mtime is already truncated to whole seconds); otherwise the local
/// content hash is authoritative.
pub async fn is_synced(
    local: &LocalFile,
    remote: &RemoteEntry,
    digest: &dyn FileDigest,
) -> Result<bool> {
    let RemoteEntry::File {
        size,
        content_hash,
        client_modified,
        ..
    } = remote
    else {
        debug!(name = %local.name, "Remote counterpart is a folder; not synced");
        return Ok(false);
    };

    if *size == local.size && *client_modified == local.client_modified {
        debug!(
            name = %local.name,
            size = local.size,
            mtime = %local.client_modified,
            "Metadata match; skipping content hash"
        );
        return Ok(true);
    }

    let local_hash = digest.digest(&local.path).await?;
    let matched = local_hash == *content_hash;
    debug!(
        name = %local.name,
        matched,
        local_hash = %local_hash,
        "Content hash comparison"
    );
    Ok(matched)
}
