// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::snapshot_file::load_snapshot;
use sy_core::{ContextMap, StatePath};
use sy_engine::{MachineConfig, StateConfig};

fn sample() -> MachineSnapshot {
    let config = MachineConfig::new("m", "idle").state("idle", StateConfig::atomic());
    MachineSnapshot {
        machine_id: "m".into(),
        config,
        current: vec![StatePath::new("idle")],
        context: ContextMap::new(),
        queued_events: Vec::new(),
        timestamp_ms: 1_700_000_000_000,
    }
}

#[tokio::test]
async fn file_persister_writes_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("machine.json");
    let persister = FilePersister::new(&path);

    persister.persist(&sample()).await.unwrap();
    assert_eq!(load_snapshot(&path).unwrap().machine_id, "m");
}

#[test]
fn file_registry_writes_versioned_files() {
    let dir = tempfile::tempdir().unwrap();
    let registry = FileRegistry::new(dir.path());

    registry.record(&sample()).unwrap();
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let name = entries[0].as_ref().unwrap().file_name();
    let name = name.to_string_lossy().into_owned();
    assert!(name.starts_with("m-"), "{name}");
    assert!(name.ends_with(".json"), "{name}");
}

#[test]
fn file_registry_same_snapshot_overwrites_same_version() {
    let dir = tempfile::tempdir().unwrap();
    let registry = FileRegistry::new(dir.path());

    registry.record(&sample()).unwrap();
    registry.record(&sample()).unwrap();
    // Identical config + timestamp → identical version id → one file
    // (plus its rotated backup)
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.iter().filter(|n| n.ends_with(".json")).count(), 1);
}
