//! Domain entities and value types

pub mod entry;
pub mod errors;
pub mod ignore;
pub mod newtypes;
pub mod report;

pub use entry::{normalize_name, LocalFile, RemoteEntry, RemoteListing, SyncDecision, WriteMode};
pub use errors::DomainError;
pub use ignore::IgnoreSet;
pub use newtypes::{ContentHash, RemotePath, SessionId};
pub use report::{FileFailure, SyncReport};
