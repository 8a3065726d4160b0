// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types surfaced by the engine

use sy_core::PathError;
use thiserror::Error;

/// Errors from configuration validation, returned by `validate` and `start`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("machine id is empty")]
    EmptyMachineId,

    #[error("machine {machine:?}: initial state is empty")]
    EmptyInitial { machine: String },

    #[error("machine {machine:?}: no states defined")]
    NoStates { machine: String },

    #[error("machine {machine:?}: unknown initial state {initial:?}")]
    UnknownInitial { machine: String, initial: String },

    #[error("state {path:?}: {reason}")]
    InvalidState { path: String, reason: String },

    #[error("state {path:?}: invalid transition target: {source}")]
    BadTargetPath {
        path: String,
        #[source]
        source: PathError,
    },

    #[error("state {path:?}: transition on {event:?} targets unknown state {target:?}")]
    UnknownTarget { path: String, event: String, target: String },

    #[error(
        "state {path:?}: duplicate transition on {event:?} (target {target:?}, priority {priority})"
    )]
    DuplicateTransition { path: String, event: String, target: String, priority: u32 },

    #[error("state {path:?} is unreachable from the initial state")]
    Orphaned { path: String },
}

/// Errors from submitting an event to a runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The bounded queue is at capacity. Backpressure signal: the caller
    /// decides whether to drop, retry, or fail.
    #[error("event queue is full")]
    QueueFull,
}

/// Errors from restoring a snapshot.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("snapshot is for machine {snapshot:?}, not {machine:?}")]
    MachineIdMismatch { machine: String, snapshot: String },

    #[error("machine must be stopped before restore")]
    NotStopped,

    #[error("snapshot config is invalid: {0}")]
    Config(#[from] ConfigError),
}

/// Observational runtime failures, surfaced through the error sink.
///
/// None of these roll back a committed transition; the worker continues with
/// the next event.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("action {action:?} failed: {source}")]
    ActionFailed {
        action: String,
        #[source]
        source: crate::actions::ActionError,
    },

    #[error("internal event {event:?} dropped: {source}")]
    InternalEventDropped {
        event: String,
        #[source]
        source: SendError,
    },

    #[error("persister failed: {0}")]
    PersisterFailed(String),

    #[error("publisher failed: {0}")]
    PublisherFailed(String),

    #[error("registry failed: {0}")]
    RegistryFailed(String),
}
