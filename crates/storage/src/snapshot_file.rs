// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence.
//!
//! Snapshots are JSON files written atomically: serialise to a sibling
//! temp file, rotate any existing snapshot into a `.bak` chain, then
//! rename into place. Recovery loads the snapshot and hands it to
//! `Machine::restore`.

use std::fs;
use std::path::{Path, PathBuf};
use sy_engine::MachineSnapshot;
use thiserror::Error;

/// Errors that can occur in snapshot file operations
#[derive(Debug, Error)]
pub enum SnapshotFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
/// The oldest backup is removed when the limit is reached.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    // Remove the oldest if at capacity
    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    // Shift existing backups up by one
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

/// Write a snapshot atomically, keeping the previous file as a backup.
pub fn save_snapshot(path: &Path, snapshot: &MachineSnapshot) -> Result<(), SnapshotFileError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_vec_pretty(snapshot)?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &json)?;

    if path.exists() {
        let bak = rotate_bak_path(path);
        let _ = fs::rename(path, bak);
    }
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), machine = %snapshot.machine_id, "snapshot written");
    Ok(())
}

/// Load a snapshot from disk.
pub fn load_snapshot(path: &Path) -> Result<MachineSnapshot, SnapshotFileError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
#[path = "snapshot_file_tests.rs"]
mod tests;
