//! Port traits (driven/secondary ports)

pub mod remote_store;

pub use remote_store::{CommitInfo, RemoteStore};
