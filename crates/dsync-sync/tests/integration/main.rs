//! Integration tests for the synchronization engine
//!
//! Drives the walker and per-file tasks against an in-memory
//! [`common::MockRemoteStore`] and tempfile-backed local trees; no
//! network involved.

mod common;
