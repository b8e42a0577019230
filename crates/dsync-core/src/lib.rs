//! dsync-core - Core domain logic for dsync
//!
//! This crate contains the provider-independent heart of dsync:
//!
//! - [`domain`] - entities and validated newtypes (local files, remote
//!   listings, sync decisions, ignore rules, the sync report)
//! - [`hash`] - the streaming Dropbox content-hash implementation
//! - [`ports`] - the [`RemoteStore`](ports::remote_store::RemoteStore)
//!   trait that adapters implement
//! - [`config`] - typed configuration with defaults and YAML loading
//!
//! No networking happens here; the only I/O is reading the optional
//! config and ignore files at startup.

pub mod config;
pub mod domain;
pub mod hash;
pub mod ports;
