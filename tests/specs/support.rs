// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures and helpers for the behavioural specs.

use std::time::Duration;
use sy_core::{Clock, StatePath};
use sy_engine::{Machine, MachineConfig, StateConfig, TransitionConfig};

pub fn p(s: &str) -> StatePath {
    StatePath::new(s)
}

/// Two-state toggle: `idle --start--> active --stop--> idle`.
pub fn toggle_machine() -> MachineConfig {
    MachineConfig::new("m", "idle")
        .state("idle", StateConfig::atomic().on("start", TransitionConfig::to("active")))
        .state("active", StateConfig::atomic().on("stop", TransitionConfig::to("idle")))
}

/// Poll until the machine's active leaves match, or panic after ~400ms.
pub async fn wait_for_current<C: Clock + 'static>(machine: &Machine<C>, expected: &[StatePath]) {
    for _ in 0..200 {
        let mut current = machine.current();
        current.sort();
        let mut want = expected.to_vec();
        want.sort();
        if current == want {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("timed out waiting for {expected:?}, current = {:?}", machine.current());
}
