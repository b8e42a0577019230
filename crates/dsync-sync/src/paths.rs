//! Local-to-remote path mapping
//!
//! Pure string mapping from (destination root, relative subdir, name)
//! to the remote's canonical forward-slash path. No I/O.

use std::path::MAIN_SEPARATOR;

use dsync_core::domain::newtypes::RemotePath;
use dsync_core::domain::DomainError;

/// Maps a local location to its canonical remote path
///
/// `subdir` uses the local separator convention and may be empty; `name`
/// may be empty to address the directory itself. Empty segments are
/// dropped and slash runs collapsed, so the result always begins with
/// exactly one `/` and never ends with one.
///
/// # Errors
/// Fails only when every segment is empty (there is no remote path for
/// "nothing"); `destination` is always non-empty in practice.
pub fn remote_path(destination: &str, subdir: &str, name: &str) -> Result<RemotePath, DomainError> {
    let subdir = subdir.replace(MAIN_SEPARATOR, "/");
    let joined = format!("{destination}/{subdir}/{name}");
    let segments: Vec<&str> = joined.split('/').filter(|s| !s.is_empty()).collect();
    RemotePath::new(format!("/{}", segments.join("/")))
}
