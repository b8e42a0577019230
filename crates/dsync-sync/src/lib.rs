//! dsync-sync - One-directional synchronization engine
//!
//! Walks a local directory tree and reconciles it against a remote
//! object-storage namespace: new or changed files are uploaded, files
//! that already match are left alone, and dry-run mode records what
//! would happen without mutating anything remote.
//!
//! Modules, leaf-first:
//!
//! - [`paths`] - pure local-to-remote path mapping
//! - [`compare`] - metadata-first equivalence with content-hash fallback
//! - [`transfer`] - direct upload and the chunked session state machine
//! - [`task`] - decision and transfer for one file
//! - [`walker`] - tree traversal, ignore pruning, and the bounded
//!   worker pool; exposes [`synchronize`], the crate's entry point

pub mod compare;
pub mod paths;
pub mod task;
pub mod transfer;
pub mod walker;

pub use compare::{FileDigest, FsDigest};
pub use task::{SyncContext, SyncTask};
pub use transfer::{ChunkedUploadSession, SessionState, TransferError};
pub use walker::{synchronize, WalkCoordinator};
