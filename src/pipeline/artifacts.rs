//! Cleanup registry for transient files produced during a job.
//!
//! Every artifact path is registered at creation time, before any operation
//! that could fail, so the error path always has a complete set of paths to
//! delete. Deletion is best-effort and unconditional at job end.

use std::path::{Path, PathBuf};

/// Registered transient paths of one job.
#[derive(Debug, Default)]
pub struct ArtifactSet {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file for deletion at job end.
    pub fn register(&mut self, path: impl Into<PathBuf>) {
        self.files.push(path.into());
    }

    /// Register a directory for recursive removal at job end.
    pub fn register_dir(&mut self, path: impl Into<PathBuf>) {
        self.dirs.push(path.into());
    }

    /// Paths registered so far (files only).
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Delete everything registered, ignoring individual failures.
    ///
    /// Files first, then directories recursively. Safe to call more than
    /// once — already-deleted paths are just more ignored failures.
    pub async fn cleanup(&self) {
        for file in &self.files {
            let _ = tokio::fs::remove_file(file).await;
        }
        for dir in &self.dirs {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }
}

/// True when no registered path still exists. Test helper for the cleanup
/// postcondition.
pub fn all_removed(paths: &[PathBuf]) -> bool {
    paths.iter().all(|p| !Path::new(p).exists())
}
