// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Microstep executor shared by the actor and tick runtimes.
//!
//! Owns the compiled caches, the active-leaf set, the context, and the
//! history tracker. Candidate search runs under the read lock; the commit
//! runs under the write lock; post-commit notices are sent after the lock
//! is released. Lock order is machine-write before history-write, always.

use crate::actions::{ActionRef, ActionRunner, ActionScope, GuardEvaluator};
use crate::compile::CompiledMachine;
use crate::config::MachineConfig;
use crate::error::{ConfigError, RuntimeError};
use crate::hooks::{CommitNotice, ErrorSink, TransitionMeta};
use crate::interpreter::{build_plan, find_candidates, select_candidate, TransitionPlan};
use crate::history::HistoryTracker;
use crate::queue::QueuedEvents;
use crate::snapshot::MachineSnapshot;
use crate::validate::validate;
use parking_lot::RwLock;
use std::sync::Arc;
use sy_core::{Clock, Context, Event, StatePath};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Collaborators injected by the owning runtime.
pub struct ExecutorDeps {
    pub runner: Arc<dyn ActionRunner>,
    pub guards: Arc<dyn GuardEvaluator>,
    pub errors: ErrorSink,
    /// Channel to the post-commit hook task, if any hooks are configured.
    pub notices: Option<mpsc::UnboundedSender<CommitNotice>>,
    /// View of the owning runtime's pending events, for snapshots.
    pub queue_view: Option<Arc<dyn QueuedEvents>>,
}

pub struct Executor<C: Clock> {
    config: Arc<MachineConfig>,
    compiled: Arc<CompiledMachine>,
    current: RwLock<Vec<StatePath>>,
    context: Context,
    history: HistoryTracker,
    clock: C,
    deps: ExecutorDeps,
}

impl<C: Clock> Executor<C> {
    /// Validate and compile a configuration. The machine starts with an
    /// empty configuration; [`Executor::enter_initial`] or
    /// [`Executor::seed`] populates it.
    pub fn new(
        config: MachineConfig,
        context: Context,
        clock: C,
        deps: ExecutorDeps,
    ) -> Result<Self, ConfigError> {
        validate(&config)?;
        let compiled = Arc::new(CompiledMachine::compile(&config));
        Ok(Self {
            config: Arc::new(config),
            compiled,
            current: RwLock::new(Vec::new()),
            context,
            history: HistoryTracker::new(),
            clock,
            deps,
        })
    }

    pub fn machine_id(&self) -> &str {
        self.compiled.machine_id()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Atomic copy of the active leaves.
    pub fn current(&self) -> Vec<StatePath> {
        self.current.read().clone()
    }

    pub fn is_entered(&self) -> bool {
        !self.current.read().is_empty()
    }

    /// Derive the initial configuration and run entry actions from the
    /// implicit root down to each initial leaf. Returns events posted by
    /// entry actions.
    pub fn enter_initial(&self) -> Vec<Event> {
        let resolution = self.compiled.resolve_initial(self.compiled.initial(), &self.history);
        let mut entered = sy_core::path::entry_paths(None, &resolution.anchor);
        entered.extend(resolution.entered);

        let mut posted = Vec::new();
        let mut errors = Vec::new();
        let start_event = Event::new("__start__");
        {
            let mut guard = self.current.write();
            for path in &entered {
                if let Some(state) = self.compiled.state(path) {
                    self.run_actions(&state.entry, &start_event, &mut posted, &mut errors);
                }
            }
            *guard = resolution.leaves;
        }
        self.flush_errors(errors);
        info!(machine = %self.machine_id(), current = ?self.current(), "machine entered initial configuration");
        posted
    }

    /// Seed runtime state from a snapshot (restore path).
    pub fn seed(&self, current: Vec<StatePath>, context: sy_core::ContextMap) {
        *self.current.write() = current;
        self.context.restore(context);
        self.history.clear_all();
    }

    /// Process one event to completion: at most one transition commits.
    /// Returns events posted by actions, or `None` if the event was
    /// discarded without side effects.
    pub fn process(&self, event: &Event) -> Option<Vec<Event>> {
        let current = self.current.read().clone();
        let candidates =
            find_candidates(&self.compiled, &current, event, self.deps.guards.as_ref(), &self.context);
        let Some(winner) = select_candidate(candidates) else {
            debug!(machine = %self.machine_id(), event = %event, "event discarded: no enabled transition");
            return None;
        };
        let plan = build_plan(&self.compiled, &current, &winner, &self.history);

        let mut posted = Vec::new();
        let mut errors = Vec::new();
        self.commit(&plan, event, &mut posted, &mut errors);

        info!(
            machine = %self.machine_id(),
            event = %event,
            source = %plan.source,
            target = %plan.target,
            "transition committed"
        );
        self.flush_errors(errors);
        self.notify_commit(event, &plan);
        Some(posted)
    }

    /// Apply a plan under the write lock: history records and exits
    /// innermost first, then transition actions, then entries outermost
    /// first, then the new leaf set.
    fn commit(
        &self,
        plan: &TransitionPlan,
        event: &Event,
        posted: &mut Vec<Event>,
        errors: &mut Vec<RuntimeError>,
    ) {
        let mut guard = self.current.write();

        for path in plan.exited.iter().rev() {
            if let Some(state) = self.compiled.state(path) {
                for (hist_path, deep) in &state.history {
                    let leaves: Vec<StatePath> =
                        guard.iter().filter(|l| path.contains(l)).cloned().collect();
                    self.history.record_exit(hist_path, path, &leaves, *deep);
                }
                self.run_actions(&state.exit, event, posted, errors);
            }
        }

        self.run_actions(&plan.actions, event, posted, errors);

        for path in &plan.entered {
            if let Some(state) = self.compiled.state(path) {
                self.run_actions(&state.entry, event, posted, errors);
            }
        }

        let mut next: Vec<StatePath> =
            guard.iter().filter(|l| !plan.removal_scope.contains(l)).cloned().collect();
        next.extend(plan.target_leaves.iter().cloned());
        *guard = next;
    }

    fn run_actions(
        &self,
        actions: &[ActionRef],
        event: &Event,
        posted: &mut Vec<Event>,
        errors: &mut Vec<RuntimeError>,
    ) {
        for action in actions {
            let mut scope = ActionScope::new(&self.context, event);
            if let Err(err) = self.deps.runner.run(action, &mut scope) {
                errors.push(RuntimeError::ActionFailed {
                    action: action.label().to_string(),
                    source: err,
                });
            }
            posted.extend(scope.take_posted());
        }
    }

    /// Action failures are observational: they surface after the commit,
    /// outside the lock, and never roll anything back.
    fn flush_errors(&self, errors: Vec<RuntimeError>) {
        for err in errors {
            (self.deps.errors)(err);
        }
    }

    fn notify_commit(&self, event: &Event, plan: &TransitionPlan) {
        eprintln!("DBG: notify_commit called for {}", plan.target);
        let Some(notices) = &self.deps.notices else { eprintln!("DBG: no notices sender"); return };
        let meta = TransitionMeta {
            machine_id: self.machine_id().to_string(),
            transition: format!("{}→{}", plan.source, plan.target),
            timestamp_ms: self.clock.epoch_ms(),
        };
        let notice =
            CommitNotice { snapshot: self.snapshot(), event: event.clone(), meta };
        // Receiver gone means the hook task shut down first; nothing to do.
        let _ = notices.send(notice);
    }

    /// Serialisable snapshot of the machine as of now.
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            machine_id: self.machine_id().to_string(),
            config: (*self.config).clone(),
            current: self.current(),
            context: self.context.snapshot(),
            queued_events: self
                .deps
                .queue_view
                .as_ref()
                .map(|q| q.queued_events())
                .unwrap_or_default(),
            timestamp_ms: self.clock.epoch_ms(),
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
