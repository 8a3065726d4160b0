// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sy_engine::{StateConfig, TransitionConfig};

fn config() -> MachineConfig {
    MachineConfig::new("m", "idle")
        .state("idle", StateConfig::atomic().on("go", TransitionConfig::to("done")))
        .state("done", StateConfig::atomic())
}

#[test]
fn version_is_deterministic() {
    let a = config_version(&config(), 1_000_000).unwrap();
    let b = config_version(&config(), 1_000_000).unwrap();
    assert_eq!(a, b);
}

#[test]
fn version_has_hash_and_timestamp_parts() {
    let version = config_version(&config(), 0).unwrap();
    let (hash, timestamp) = version.split_once('-').unwrap();
    assert_eq!(hash.len(), 8);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(timestamp.starts_with("1970-01-01T00:00:00"));
}

#[test]
fn different_configs_hash_differently() {
    let other = MachineConfig::new("m", "idle").state("idle", StateConfig::atomic());
    let a = config_version(&config(), 1_000_000).unwrap();
    let b = config_version(&other, 1_000_000).unwrap();
    assert_ne!(a.split_once('-').unwrap().0, b.split_once('-').unwrap().0);
}

#[test]
fn timestamp_changes_version_but_not_hash() {
    let a = config_version(&config(), 1_000_000).unwrap();
    let b = config_version(&config(), 2_000_000).unwrap();
    assert_ne!(a, b);
    assert_eq!(a.split_once('-').unwrap().0, b.split_once('-').unwrap().0);
}
