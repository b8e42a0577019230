//! Run summary
//!
//! [`SyncReport`] is the single value a run hands back to the caller:
//! counters per decision, one entry per failed file, and wall-clock
//! duration. Per-file failures live here instead of aborting the run.

use serde::{Deserialize, Serialize};

use super::entry::SyncDecision;

/// A per-file failure recorded during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    /// Local path of the file that failed
    pub path: String,
    /// Human-readable failure description
    pub error: String,
}

/// Summary of one completed synchronization run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Files uploaded in create mode
    pub created: u32,
    /// Files uploaded in overwrite mode
    pub overwritten: u32,
    /// Files already in sync
    pub skipped: u32,
    /// Files whose transfer failed
    pub failed: u32,
    /// One entry per failed file
    pub failures: Vec<FileFailure>,
    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,
}

impl SyncReport {
    /// Records one successfully handled file under its decision
    pub fn record(&mut self, decision: SyncDecision) {
        match decision {
            SyncDecision::Skip => self.skipped += 1,
            SyncDecision::CreateNew => self.created += 1,
            SyncDecision::Overwrite => self.overwritten += 1,
        }
    }

    /// Records one failed file
    pub fn record_failure(&mut self, path: impl Into<String>, error: impl Into<String>) {
        self.failed += 1;
        self.failures.push(FileFailure {
            path: path.into(),
            error: error.into(),
        });
    }

    /// Total number of files the run looked at
    #[must_use]
    pub fn total(&self) -> u32 {
        self.created + self.overwritten + self.skipped + self.failed
    }
}
