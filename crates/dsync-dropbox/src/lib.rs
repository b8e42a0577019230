//! dsync-dropbox - Dropbox HTTP API v2 adapter
//!
//! Implements the [`RemoteStore`](dsync_core::ports::remote_store::RemoteStore)
//! port over Dropbox's split API surface: RPC endpoints on
//! `api.dropboxapi.com` (folder listing) and content endpoints on
//! `content.dropboxapi.com` (upload, sessions, download) with JSON
//! arguments riding the `Dropbox-API-Arg` header.
//!
//! ## Dropbox API References
//!
//! - [files/list_folder](https://www.dropbox.com/developers/documentation/http/documentation#files-list_folder)
//! - [files/upload](https://www.dropbox.com/developers/documentation/http/documentation#files-upload)
//! - [files/upload_session](https://www.dropbox.com/developers/documentation/http/documentation#files-upload_session-start)

pub mod auth;
pub mod client;
pub mod files;

pub use auth::resolve_token;
pub use client::DropboxClient;
