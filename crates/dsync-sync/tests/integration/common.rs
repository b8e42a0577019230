//! Shared test helpers: an in-memory, call-recording remote store

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use dsync_core::domain::entry::{RemoteEntry, RemoteListing, WriteMode};
use dsync_core::domain::newtypes::{ContentHash, RemotePath, SessionId};
use dsync_core::hash::ContentHasher;
use dsync_core::ports::remote_store::{CommitInfo, RemoteStore};

/// One recorded direct upload
#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub path: String,
    pub overwrite: bool,
    pub autorename: bool,
    pub len: u64,
}

/// One recorded chunked-session round trip
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum SessionEvent {
    Start { len: u64 },
    Append { offset: u64, len: u64 },
    Finish { offset: u64, len: u64, path: String },
}

/// In-memory remote store with preset listings and failure injection
#[derive(Default)]
pub struct MockRemoteStore {
    folders: Mutex<HashMap<String, Vec<RemoteEntry>>>,
    fail_uploads: Mutex<HashSet<String>>,
    pub list_calls: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<UploadRecord>>,
    pub session_events: Mutex<Vec<SessionEvent>>,
}

impl MockRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presets the listing for one remote directory
    pub fn with_folder(self, path: &str, entries: Vec<RemoteEntry>) -> Self {
        self.folders.lock().unwrap().insert(path.to_string(), entries);
        self
    }

    /// Makes every upload to `path` fail
    pub fn fail_upload(self, path: &str) -> Self {
        self.fail_uploads.lock().unwrap().insert(path.to_string());
        self
    }

    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.uploads.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn session_events(&self) -> Vec<SessionEvent> {
        self.session_events.lock().unwrap().clone()
    }

    fn committed_entry(commit: &CommitInfo, size: u64) -> RemoteEntry {
        RemoteEntry::File {
            name: commit
                .path
                .as_str()
                .rsplit('/')
                .next()
                .unwrap()
                .to_string(),
            size,
            content_hash: ContentHash::new("0".repeat(64)).unwrap(),
            client_modified: commit.client_modified.unwrap_or_else(Utc::now),
        }
    }
}

#[async_trait::async_trait]
impl RemoteStore for MockRemoteStore {
    async fn list_folder(&self, path: &RemotePath) -> anyhow::Result<RemoteListing> {
        self.list_calls
            .lock()
            .unwrap()
            .push(path.as_str().to_string());
        match self.folders.lock().unwrap().get(path.as_str()) {
            Some(entries) => Ok(entries.iter().cloned().collect()),
            None => anyhow::bail!("path/not_found/ for {path}"),
        }
    }

    async fn upload(&self, data: Vec<u8>, commit: &CommitInfo) -> anyhow::Result<RemoteEntry> {
        if self
            .fail_uploads
            .lock()
            .unwrap()
            .contains(commit.path.as_str())
        {
            anyhow::bail!("injected upload failure for {}", commit.path);
        }
        self.uploads.lock().unwrap().push(UploadRecord {
            path: commit.path.as_str().to_string(),
            overwrite: matches!(commit.mode, WriteMode::Overwrite),
            autorename: commit.autorename,
            len: data.len() as u64,
        });
        Ok(Self::committed_entry(commit, data.len() as u64))
    }

    async fn upload_session_start(&self, data: Vec<u8>) -> anyhow::Result<SessionId> {
        self.session_events
            .lock()
            .unwrap()
            .push(SessionEvent::Start {
                len: data.len() as u64,
            });
        Ok(SessionId::new("mock-session").unwrap())
    }

    async fn upload_session_append(
        &self,
        data: Vec<u8>,
        _session_id: &SessionId,
        offset: u64,
    ) -> anyhow::Result<()> {
        self.session_events
            .lock()
            .unwrap()
            .push(SessionEvent::Append {
                offset,
                len: data.len() as u64,
            });
        Ok(())
    }

    async fn upload_session_finish(
        &self,
        data: Vec<u8>,
        _session_id: &SessionId,
        offset: u64,
        commit: &CommitInfo,
    ) -> anyhow::Result<RemoteEntry> {
        self.session_events
            .lock()
            .unwrap()
            .push(SessionEvent::Finish {
                offset,
                len: data.len() as u64,
                path: commit.path.as_str().to_string(),
            });
        Ok(Self::committed_entry(commit, offset + data.len() as u64))
    }

    async fn download(&self, _path: &RemotePath) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// Content hash of a byte slice, via the production hasher
pub fn hash_of(data: &[u8]) -> ContentHash {
    let mut hasher = ContentHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Whole-second UTC mtime of an on-disk file
pub fn mtime_of(path: &std::path::Path) -> DateTime<Utc> {
    let mtime: SystemTime = std::fs::metadata(path).unwrap().modified().unwrap();
    dsync_core::domain::entry::truncate_mtime(mtime)
}

/// Remote file record helper
pub fn remote_file(
    name: &str,
    size: u64,
    hash: ContentHash,
    client_modified: DateTime<Utc>,
) -> RemoteEntry {
    RemoteEntry::File {
        name: name.to_string(),
        size,
        content_hash: hash,
        client_modified,
    }
}
