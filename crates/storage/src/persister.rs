// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed implementations of the engine's persistence seams.

use crate::snapshot_file::save_snapshot;
use crate::version::config_version;
use async_trait::async_trait;
use std::path::PathBuf;
use sy_engine::{MachineSnapshot, Persister, SnapshotRegistry};

/// Writes each post-commit snapshot to a fixed path, rotating backups.
pub struct FilePersister {
    path: PathBuf,
}

impl FilePersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl Persister for FilePersister {
    async fn persist(&self, snapshot: &MachineSnapshot) -> Result<(), String> {
        save_snapshot(&self.path, snapshot).map_err(|e| e.to_string())
    }
}

/// Stores versioned snapshots under a directory, one file per version.
pub struct FileRegistry {
    dir: PathBuf,
}

impl FileRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SnapshotRegistry for FileRegistry {
    fn record(&self, snapshot: &MachineSnapshot) -> Result<(), String> {
        let version = config_version(&snapshot.config, snapshot.timestamp_ms)
            .map_err(|e| e.to_string())?;
        let path = self
            .dir
            .join(format!("{}-{}.json", snapshot.machine_id, version));
        save_snapshot(&path, snapshot).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
#[path = "persister_tests.rs"]
mod tests;
