//! File operations and the `RemoteStore` implementation
//!
//! Response DTOs mirror Dropbox's tagged metadata unions (`.tag` =
//! `file` / `folder` / `deleted`); conversion into the domain's
//! [`RemoteEntry`] happens here so the engine never sees wire shapes.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use dsync_core::domain::entry::{RemoteEntry, RemoteListing, WriteMode};
use dsync_core::domain::newtypes::{ContentHash, RemotePath, SessionId};
use dsync_core::ports::remote_store::{CommitInfo, RemoteStore};

use crate::client::DropboxClient;

/// Timestamp format Dropbox stores for `client_modified`
/// (whole seconds, UTC, trailing `Z`)
const CLIENT_MODIFIED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// ============================================================================
// Response DTOs
// ============================================================================

/// One entry in a `list_folder` page, discriminated by `.tag`
#[derive(Debug, Deserialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
enum MetadataEntry {
    File(FileMetadata),
    Folder { name: String },
    Deleted { name: String },
    #[serde(other)]
    Unknown,
}

/// File metadata as returned by listing, upload, and finish calls
#[derive(Debug, Deserialize)]
struct FileMetadata {
    name: String,
    size: u64,
    content_hash: Option<String>,
    client_modified: String,
}

impl FileMetadata {
    /// Converts into the domain entry; fails on malformed fields
    fn into_entry(self) -> Result<RemoteEntry> {
        let hash = self
            .content_hash
            .with_context(|| format!("File metadata for {} carries no content_hash", self.name))?;
        let content_hash = ContentHash::new(hash)
            .with_context(|| format!("Malformed content_hash for {}", self.name))?;
        let client_modified = DateTime::parse_from_rfc3339(&self.client_modified)
            .with_context(|| format!("Malformed client_modified for {}", self.name))?
            .with_timezone(&Utc);
        Ok(RemoteEntry::File {
            name: self.name,
            size: self.size,
            content_hash,
            client_modified,
        })
    }
}

/// One page of `list_folder` results
#[derive(Debug, Deserialize)]
struct ListFolderResponse {
    entries: Vec<MetadataEntry>,
    cursor: String,
    has_more: bool,
}

/// Response from `upload_session/start`
#[derive(Debug, Deserialize)]
struct SessionStartResponse {
    session_id: String,
}

// ============================================================================
// Argument construction
// ============================================================================

fn mode_tag(mode: WriteMode) -> &'static str {
    match mode {
        WriteMode::Add => "add",
        WriteMode::Overwrite => "overwrite",
    }
}

fn format_client_modified(dt: &DateTime<Utc>) -> String {
    dt.format(CLIENT_MODIFIED_FORMAT).to_string()
}

/// Commit arguments shared by `upload` and `upload_session/finish`
fn commit_args(commit: &CommitInfo) -> serde_json::Value {
    let mut args = json!({
        "path": commit.path.as_str(),
        "mode": mode_tag(commit.mode),
        "autorename": commit.autorename,
        "mute": true,
    });
    if let Some(dt) = &commit.client_modified {
        args["client_modified"] = json!(format_client_modified(dt));
    }
    args
}

fn cursor_args(session_id: &SessionId, offset: u64) -> serde_json::Value {
    json!({
        "session_id": session_id.as_str(),
        "offset": offset,
    })
}

// ============================================================================
// RemoteStore implementation
// ============================================================================

#[async_trait::async_trait]
impl RemoteStore for DropboxClient {
    async fn list_folder(&self, path: &RemotePath) -> Result<RemoteListing> {
        let mut listing = RemoteListing::empty();

        let response = self
            .rpc("/2/files/list_folder", &json!({ "path": path.as_str() }))
            .await?;
        if !response.status().is_success() {
            bail!(
                "Listing {path} failed: {}",
                Self::error_summary(response).await
            );
        }
        let mut page: ListFolderResponse = response
            .json()
            .await
            .context("Failed to parse list_folder response")?;
        absorb_entries(&mut listing, page.entries);

        while page.has_more {
            let response = self
                .rpc(
                    "/2/files/list_folder/continue",
                    &json!({ "cursor": page.cursor }),
                )
                .await?;
            if !response.status().is_success() {
                bail!(
                    "Listing continuation for {path} failed: {}",
                    Self::error_summary(response).await
                );
            }
            page = response
                .json()
                .await
                .context("Failed to parse list_folder/continue response")?;
            absorb_entries(&mut listing, page.entries);
        }

        debug!(path = %path, entries = listing.len(), "Listed remote folder");
        Ok(listing)
    }

    async fn upload(&self, data: Vec<u8>, commit: &CommitInfo) -> Result<RemoteEntry> {
        let response = self
            .content("/2/files/upload", &commit_args(commit), data)
            .await?;
        if !response.status().is_success() {
            bail!(
                "Upload to {} failed: {}",
                commit.path,
                Self::error_summary(response).await
            );
        }
        let metadata: FileMetadata = response
            .json()
            .await
            .context("Failed to parse upload response")?;
        metadata.into_entry()
    }

    async fn upload_session_start(&self, data: Vec<u8>) -> Result<SessionId> {
        let response = self
            .content("/2/files/upload_session/start", &json!({ "close": false }), data)
            .await?;
        if !response.status().is_success() {
            bail!(
                "upload_session/start failed: {}",
                Self::error_summary(response).await
            );
        }
        let started: SessionStartResponse = response
            .json()
            .await
            .context("Failed to parse upload_session/start response")?;
        Ok(SessionId::new(started.session_id)?)
    }

    async fn upload_session_append(
        &self,
        data: Vec<u8>,
        session_id: &SessionId,
        offset: u64,
    ) -> Result<()> {
        let arg = json!({
            "cursor": cursor_args(session_id, offset),
            "close": false,
        });
        let response = self
            .content("/2/files/upload_session/append_v2", &arg, data)
            .await?;
        if !response.status().is_success() {
            bail!(
                "upload_session/append_v2 at offset {offset} failed: {}",
                Self::error_summary(response).await
            );
        }
        Ok(())
    }

    async fn upload_session_finish(
        &self,
        data: Vec<u8>,
        session_id: &SessionId,
        offset: u64,
        commit: &CommitInfo,
    ) -> Result<RemoteEntry> {
        let arg = json!({
            "cursor": cursor_args(session_id, offset),
            "commit": commit_args(commit),
        });
        let response = self
            .content("/2/files/upload_session/finish", &arg, data)
            .await?;
        if !response.status().is_success() {
            bail!(
                "upload_session/finish for {} failed: {}",
                commit.path,
                Self::error_summary(response).await
            );
        }
        let metadata: FileMetadata = response
            .json()
            .await
            .context("Failed to parse upload_session/finish response")?;
        metadata.into_entry()
    }

    async fn download(&self, path: &RemotePath) -> Result<Option<Vec<u8>>> {
        let response = self
            .content(
                "/2/files/download",
                &json!({ "path": path.as_str() }),
                Vec::new(),
            )
            .await?;
        let status = response.status();
        if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .context("Failed to read download body")?;
            debug!(path = %path, len = bytes.len(), "Downloaded");
            return Ok(Some(bytes.to_vec()));
        }
        if Self::is_conflict(status) {
            let summary = Self::error_summary(response).await;
            if summary.contains("not_found") {
                debug!(path = %path, "Download target does not exist");
                return Ok(None);
            }
            bail!("Download of {path} failed: {summary}");
        }
        bail!(
            "Download of {path} failed: {}",
            Self::error_summary(response).await
        );
    }
}

/// Folds one listing page into the accumulated listing
fn absorb_entries(listing: &mut RemoteListing, entries: Vec<MetadataEntry>) {
    for entry in entries {
        match entry {
            MetadataEntry::File(metadata) => match metadata.into_entry() {
                Ok(entry) => listing.insert(entry),
                Err(e) => warn!(error = format!("{e:#}"), "Skipping malformed file entry"),
            },
            MetadataEntry::Folder { name } => listing.insert(RemoteEntry::Folder { name }),
            MetadataEntry::Deleted { .. } | MetadataEntry::Unknown => {}
        }
    }
}
