// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extensibility seams around the interpreter.
//!
//! Hooks observe committed state; none of them can influence a transition.
//! Post-commit notices are dispatched on a dedicated task so persister and
//! publisher latency never couples into the worker. The task consumes
//! notices in commit order, so each hook individually observes snapshots in
//! the order they were committed.

use crate::config::MachineConfig;
use crate::error::RuntimeError;
use crate::snapshot::MachineSnapshot;
use async_trait::async_trait;
use std::sync::Arc;
use sy_core::{Event, StatePath};
use tokio::sync::mpsc;

/// Metadata attached to each published transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionMeta {
    pub machine_id: String,
    /// `"source→target"` of the committed transition.
    pub transition: String,
    pub timestamp_ms: u64,
}

/// Receives the post-commit snapshot after each transition.
#[async_trait]
pub trait Persister: Send + Sync {
    async fn persist(&self, snapshot: &MachineSnapshot) -> Result<(), String>;
}

/// Receives the triggering event plus metadata after each transition.
pub trait Publisher: Send + Sync {
    fn publish(&self, event: &Event, meta: &TransitionMeta);
}

/// Versioning sink for committed snapshots.
pub trait SnapshotRegistry: Send + Sync {
    fn record(&self, snapshot: &MachineSnapshot) -> Result<(), String>;
}

/// Renders a configuration plus active leaves to a diagram format.
pub trait Visualizer: Send + Sync {
    fn render(&self, config: &MachineConfig, current: &[StatePath]) -> String;
}

/// External producer whose events are forwarded into the machine queue.
#[async_trait]
pub trait EventSource: Send {
    /// Next event, or `None` when the source is exhausted.
    async fn next_event(&mut self) -> Option<Event>;
}

/// Sink for observational runtime failures. The default logs a warning.
pub type ErrorSink = Arc<dyn Fn(RuntimeError) + Send + Sync>;

pub fn default_error_sink() -> ErrorSink {
    Arc::new(|err| tracing::warn!(error = %err, "runtime error"))
}

/// One committed transition, as seen by the hook task.
#[derive(Debug, Clone)]
pub struct CommitNotice {
    pub snapshot: MachineSnapshot,
    pub event: Event,
    pub meta: TransitionMeta,
}

/// Hook endpoints bundled for the dispatcher task.
#[derive(Default)]
pub struct Hooks {
    pub persister: Option<Arc<dyn Persister>>,
    pub publisher: Option<Arc<dyn Publisher>>,
    pub registry: Option<Arc<dyn SnapshotRegistry>>,
}

impl Hooks {
    pub fn is_empty(&self) -> bool {
        self.persister.is_none() && self.publisher.is_none() && self.registry.is_none()
    }

    /// Consume notices until the channel closes, fanning each one out.
    /// Hook failures go to the error sink and never poison the machine.
    pub async fn run(self, mut rx: mpsc::UnboundedReceiver<CommitNotice>, errors: ErrorSink) {
        while let Some(notice) = rx.recv().await {
            eprintln!("DBG: hooks got notice {:?}", notice.meta.transition);
            if let Some(persister) = &self.persister {
                if let Err(err) = persister.persist(&notice.snapshot).await {
                    errors(RuntimeError::PersisterFailed(err));
                }
            }
            if let Some(publisher) = &self.publisher {
                publisher.publish(&notice.event, &notice.meta);
            }
            if let Some(registry) = &self.registry {
                if let Err(err) = registry.record(&notice.snapshot) {
                    errors(RuntimeError::RegistryFailed(err));
                }
            }
        }
    }
}
