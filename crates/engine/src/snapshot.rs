// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time snapshot of a machine.
//!
//! Snapshots round-trip: `save → load → restore` yields the same current
//! configuration and context. Function-valued action and guard refs
//! serialise as a sentinel and do not survive the trip; persistable
//! machines use named refs resolved by a registry.

use crate::config::MachineConfig;
use serde::{Deserialize, Serialize};
use sy_core::{ContextMap, Event, StatePath};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub machine_id: String,
    pub config: MachineConfig,
    /// Active leaf paths at snapshot time.
    pub current: Vec<StatePath>,
    pub context: ContextMap,
    /// Events pending in the queue, in drain order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queued_events: Vec<Event>,
    pub timestamp_ms: u64,
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
