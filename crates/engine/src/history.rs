// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recorded history for shallow and deep history states.
//!
//! Keyed by the history pseudo-state's full path. Records are written while
//! the machine write-lock is held (exit processing); the lock order is
//! always machine-write before history-write.

use parking_lot::RwLock;
use smol_str::SmolStr;
use std::collections::HashMap;
use sy_core::StatePath;

#[derive(Debug, Default)]
struct HistoryMaps {
    /// History path → direct child id active when the parent last exited.
    shallow: HashMap<StatePath, SmolStr>,
    /// History path → full leaf configuration when the parent last exited.
    deep: HashMap<StatePath, Vec<StatePath>>,
}

/// Thread-safe shallow/deep history store.
#[derive(Debug, Default)]
pub struct HistoryTracker {
    inner: RwLock<HistoryMaps>,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the configuration under `parent` as it exits.
    ///
    /// `active_leaves` are the pre-transition leaves below `parent`. Shallow
    /// records keep only the direct child on the first leaf's chain; deep
    /// records keep the full leaf list.
    pub fn record_exit(
        &self,
        history_path: &StatePath,
        parent: &StatePath,
        active_leaves: &[StatePath],
        deep: bool,
    ) {
        let mut guard = self.inner.write();
        if deep {
            guard.deep.insert(history_path.clone(), active_leaves.to_vec());
        } else if let Some(child_id) = active_leaves
            .first()
            .and_then(|leaf| leaf.segments().nth(parent.depth()))
        {
            guard.shallow.insert(history_path.clone(), SmolStr::new(child_id));
        }
    }

    /// Previously recorded configuration, if any.
    ///
    /// Shallow records come back as the single full path of the recorded
    /// direct child (the caller continues the normal initial descent from
    /// there); deep records come back as the recorded leaf list.
    pub fn restore(&self, history_path: &StatePath, deep: bool) -> Option<Vec<StatePath>> {
        let guard = self.inner.read();
        if deep {
            guard.deep.get(history_path).cloned()
        } else {
            let child_id = guard.shallow.get(history_path)?;
            let parent = history_path.parent()?;
            Some(vec![parent.join(child_id)])
        }
    }

    /// Drop both records for a history state.
    pub fn clear(&self, history_path: &StatePath) {
        let mut guard = self.inner.write();
        guard.shallow.remove(history_path);
        guard.deep.remove(history_path);
    }

    /// Drop all records. Used by restore to reset runtime state.
    pub fn clear_all(&self) {
        let mut guard = self.inner.write();
        guard.shallow.clear();
        guard.deep.clear();
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
