// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sy-engine: Hierarchical statechart interpreter and runtimes.
//!
//! A [`MachineConfig`] describes a tree of atomic, compound, parallel, and
//! history states with guarded, prioritised transitions. The [`Machine`]
//! runtime queues events into a bounded queue drained by a worker task; the
//! [`TickMachine`] runtime drains a deterministic priority queue in batches
//! at a fixed cadence. Both share the interpreter in [`interpreter`].

pub mod actions;
pub mod compile;
pub mod config;
pub mod error;
pub mod executor;
pub mod history;
pub mod hooks;
pub mod interpreter;
pub mod machine;
pub mod queue;
pub mod snapshot;
pub mod tick;
pub mod validate;


pub use actions::{
    ActionError, ActionRef, ActionRunner, ActionScope, GuardEvaluator, GuardRef, Registry,
    RegistryDispatch,
};
pub use compile::{CompiledMachine, CompiledState};
pub use config::{MachineConfig, StateConfig, StateType, TransitionConfig};
pub use error::{ConfigError, RestoreError, RuntimeError, SendError};
pub use history::HistoryTracker;
pub use hooks::{EventSource, Persister, Publisher, SnapshotRegistry, TransitionMeta, Visualizer};
pub use machine::{Machine, MachineOptions};
pub use snapshot::MachineSnapshot;
pub use tick::{TickConfig, TickMachine};
pub use validate::validate;
