// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot save/load/restore round trips through the storage adapters.

use super::support::{p, toggle_machine, wait_for_current};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use sy_core::Event;
use sy_engine::{Machine, MachineOptions};
use sy_storage::{load_snapshot, save_snapshot, FilePersister};

#[tokio::test]
async fn save_load_restore_preserves_current_and_context() {
    let machine = Machine::new(toggle_machine());
    machine.start().unwrap();
    machine.send(Event::new("start")).unwrap();
    wait_for_current(&machine, &[p("active")]).await;
    machine.context().unwrap().set("score", json!(9000));
    machine.stop().await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    save_snapshot(&path, &machine.snapshot().unwrap()).unwrap();

    let restored = Machine::new(toggle_machine());
    restored.restore(load_snapshot(&path).unwrap()).unwrap();

    assert_eq!(restored.current(), vec![p("active")]);
    assert_eq!(restored.context().unwrap().get("score"), Some(json!(9000)));
}

#[tokio::test]
async fn file_persister_tracks_every_commit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("machine.json");
    let machine = Machine::with_options(
        toggle_machine(),
        MachineOptions::new().persister(Arc::new(FilePersister::new(&path))),
    );
    machine.start().unwrap();
    machine.send(Event::new("start")).unwrap();
    wait_for_current(&machine, &[p("active")]).await;

    // The persister runs on the hook task; give it a moment
    for _ in 0..200 {
        if path.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    machine.stop().await;

    let persisted = load_snapshot(&path).unwrap();
    assert_eq!(persisted.current, vec![p("active")]);
    assert_eq!(persisted.machine_id, "m");
}

#[tokio::test]
async fn persisted_snapshot_resumes_processing_after_restore() {
    let machine = Machine::new(toggle_machine());
    machine.start().unwrap();
    wait_for_current(&machine, &[p("idle")]).await;
    machine.stop().await;
    // A pending event survives the snapshot
    machine.send(Event::new("start")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    save_snapshot(&path, &machine.snapshot().unwrap()).unwrap();

    let restored = Machine::new(toggle_machine());
    restored.restore(load_snapshot(&path).unwrap()).unwrap();
    restored.start().unwrap();
    wait_for_current(&restored, &[p("active")]).await;
    restored.stop().await;
}
