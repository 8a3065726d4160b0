// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Asynchronous actor runtime.
//!
//! Producers submit events through a thread-safe, non-blocking [`Machine::send`];
//! a single worker task drains the bounded queue in FIFO order and drives
//! the executor, so commits are serial. Shutdown is cooperative: the worker
//! finishes the in-flight event, and later sends are still accepted into
//! the queue but not processed.

use crate::actions::{ActionRunner, GuardEvaluator, Registry, RegistryDispatch};
use crate::config::MachineConfig;
use crate::error::{ConfigError, RestoreError, RuntimeError, SendError};
use crate::executor::{Executor, ExecutorDeps};
use crate::hooks::{
    default_error_sink, CommitNotice, ErrorSink, EventSource, Hooks, Persister, Publisher,
    SnapshotRegistry, Visualizer,
};
use crate::queue::{EventQueue, QueuedEvents};
use crate::snapshot::MachineSnapshot;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use sy_core::{Clock, Context, Event, StatePath, SystemClock};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default bounded queue capacity.
pub const DEFAULT_QUEUE_SIZE: usize = 1000;

/// Optional collaborators and tuning knobs.
#[derive(Default)]
pub struct MachineOptions {
    pub queue_size: Option<usize>,
    /// Named actions and guards for the default dispatch.
    pub action_registry: Option<Arc<Registry>>,
    /// Full override of action execution.
    pub action_runner: Option<Arc<dyn ActionRunner>>,
    /// Full override of guard evaluation.
    pub guard_evaluator: Option<Arc<dyn GuardEvaluator>>,
    pub event_source: Option<Box<dyn EventSource>>,
    pub persister: Option<Arc<dyn Persister>>,
    pub publisher: Option<Arc<dyn Publisher>>,
    pub visualizer: Option<Arc<dyn Visualizer>>,
    pub registry: Option<Arc<dyn SnapshotRegistry>>,
    pub error_sink: Option<ErrorSink>,
}

impl MachineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_size(mut self, capacity: usize) -> Self {
        self.queue_size = Some(capacity);
        self
    }

    pub fn action_registry(mut self, registry: Registry) -> Self {
        self.action_registry = Some(Arc::new(registry));
        self
    }

    pub fn action_runner(mut self, runner: Arc<dyn ActionRunner>) -> Self {
        self.action_runner = Some(runner);
        self
    }

    pub fn guard_evaluator(mut self, guards: Arc<dyn GuardEvaluator>) -> Self {
        self.guard_evaluator = Some(guards);
        self
    }

    pub fn event_source(mut self, source: Box<dyn EventSource>) -> Self {
        self.event_source = Some(source);
        self
    }

    pub fn persister(mut self, persister: Arc<dyn Persister>) -> Self {
        self.persister = Some(persister);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn visualizer(mut self, visualizer: Arc<dyn Visualizer>) -> Self {
        self.visualizer = Some(visualizer);
        self
    }

    pub fn registry(mut self, registry: Arc<dyn SnapshotRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn error_sink(mut self, sink: ErrorSink) -> Self {
        self.error_sink = Some(sink);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Stopped,
}

/// Queued-actor statechart runtime.
pub struct Machine<C: Clock = SystemClock> {
    config: Mutex<MachineConfig>,
    queue: Arc<EventQueue>,
    exec: RwLock<Option<Arc<Executor<C>>>>,
    clock: C,
    runner: Arc<dyn ActionRunner>,
    guards: Arc<dyn GuardEvaluator>,
    errors: ErrorSink,
    visualizer: Option<Arc<dyn Visualizer>>,
    notices_tx: Option<mpsc::UnboundedSender<CommitNotice>>,
    pending_hooks: Mutex<Option<(Hooks, mpsc::UnboundedReceiver<CommitNotice>)>>,
    event_source: Mutex<Option<Box<dyn EventSource>>>,
    phase: Mutex<Phase>,
    cancel: Mutex<CancellationToken>,
    worker: Mutex<Option<JoinHandle<()>>>,
    source_task: Mutex<Option<JoinHandle<()>>>,
}

impl Machine<SystemClock> {
    pub fn new(config: MachineConfig) -> Self {
        Self::with_options(config, MachineOptions::default())
    }

    pub fn with_options(config: MachineConfig, options: MachineOptions) -> Self {
        Self::with_clock(config, options, SystemClock)
    }
}

impl<C: Clock + 'static> Machine<C> {
    pub fn with_clock(config: MachineConfig, mut options: MachineOptions, clock: C) -> Self {
        let queue =
            Arc::new(EventQueue::new(options.queue_size.unwrap_or(DEFAULT_QUEUE_SIZE)));
        let errors = options.error_sink.take().unwrap_or_else(default_error_sink);

        let dispatch = Arc::new(RegistryDispatch::new(
            options.action_registry.take().unwrap_or_default(),
        ));
        let runner: Arc<dyn ActionRunner> =
            options.action_runner.take().unwrap_or_else(|| dispatch.clone());
        let guards: Arc<dyn GuardEvaluator> =
            options.guard_evaluator.take().unwrap_or(dispatch);

        let hooks = Hooks {
            persister: options.persister.take(),
            publisher: options.publisher.take(),
            registry: options.registry.take(),
        };
        let (notices_tx, pending_hooks) = if hooks.is_empty() {
            (None, None)
        } else {
            let (tx, rx) = mpsc::unbounded_channel();
            (Some(tx), Some((hooks, rx)))
        };

        Self {
            config: Mutex::new(config),
            queue,
            exec: RwLock::new(None),
            clock,
            runner,
            guards,
            errors,
            visualizer: options.visualizer.take(),
            notices_tx,
            pending_hooks: Mutex::new(pending_hooks),
            event_source: Mutex::new(options.event_source.take()),
            phase: Mutex::new(Phase::Idle),
            cancel: Mutex::new(CancellationToken::new()),
            worker: Mutex::new(None),
            source_task: Mutex::new(None),
        }
    }

    pub fn machine_id(&self) -> String {
        self.config.lock().id.clone()
    }

    /// Atomic snapshot copy of the active leaves. Empty before start.
    pub fn current(&self) -> Vec<StatePath> {
        self.exec.read().as_ref().map(|e| e.current()).unwrap_or_default()
    }

    /// Shared context handle. Created at first start (or restore).
    pub fn context(&self) -> Option<Context> {
        self.exec.read().as_ref().map(|e| e.context().clone())
    }

    /// Non-blocking enqueue. `QueueFull` is the backpressure signal; events
    /// are accepted (but not processed) while the machine is stopped.
    pub fn send(&self, event: Event) -> Result<(), SendError> {
        self.queue.push(event)
    }

    /// Validate, build caches, derive the initial configuration, and spawn
    /// the worker. Idempotent once running.
    pub fn start(&self) -> Result<(), ConfigError> {
        let mut phase = self.phase.lock();
        if *phase == Phase::Running {
            return Ok(());
        }

        let exec = self.ensure_executor()?;
        if !exec.is_entered() {
            let posted = exec.enter_initial();
            self.enqueue_posted(posted);
        }

        if let Some((hooks, rx)) = self.pending_hooks.lock().take() {
            tokio::spawn(hooks.run(rx, self.errors.clone()));
        }

        let cancel = CancellationToken::new();
        *self.cancel.lock() = cancel.clone();
        *self.worker.lock() = Some(tokio::spawn(run_worker(
            exec,
            Arc::clone(&self.queue),
            self.errors.clone(),
            cancel.clone(),
        )));
        if let Some(source) = self.event_source.lock().take() {
            *self.source_task.lock() = Some(tokio::spawn(run_source(
                source,
                Arc::clone(&self.queue),
                self.errors.clone(),
                cancel,
            )));
        }

        *phase = Phase::Running;
        Ok(())
    }

    /// Cooperative shutdown: the worker finishes the in-flight event, then
    /// exits. Idempotent.
    pub async fn stop(&self) {
        let (worker, source) = {
            let mut phase = self.phase.lock();
            if *phase != Phase::Running {
                return;
            }
            *phase = Phase::Stopped;
            self.cancel.lock().cancel();
            (self.worker.lock().take(), self.source_task.lock().take())
        };
        if let Some(handle) = worker {
            let _ = handle.await;
        }
        if let Some(handle) = source {
            let _ = handle.await;
        }
        debug!(machine = %self.machine_id(), "machine stopped");
    }

    /// Serialisable snapshot, `None` before the first start or restore.
    pub fn snapshot(&self) -> Option<MachineSnapshot> {
        self.exec.read().as_ref().map(|e| e.snapshot())
    }

    /// Replace config, current configuration, context, and queued events
    /// from a snapshot. Only valid on a machine that is not running.
    pub fn restore(&self, snapshot: MachineSnapshot) -> Result<(), RestoreError> {
        let phase = self.phase.lock();
        if *phase == Phase::Running {
            return Err(RestoreError::NotStopped);
        }
        let machine_id = self.config.lock().id.clone();
        if snapshot.machine_id != machine_id {
            return Err(RestoreError::MachineIdMismatch {
                machine: machine_id,
                snapshot: snapshot.machine_id,
            });
        }

        let exec = Arc::new(Executor::new(
            snapshot.config.clone(),
            Context::new(),
            self.clock.clone(),
            self.deps(),
        )?);
        exec.seed(snapshot.current, snapshot.context);
        self.queue.replace(snapshot.queued_events);
        *self.config.lock() = snapshot.config;
        *self.exec.write() = Some(exec);
        Ok(())
    }

    /// Render the configuration and active leaves through the configured
    /// visualizer.
    pub fn render(&self) -> Option<String> {
        let visualizer = self.visualizer.as_ref()?;
        let config = self.config.lock().clone();
        Some(visualizer.render(&config, &self.current()))
    }

    fn deps(&self) -> ExecutorDeps {
        ExecutorDeps {
            runner: Arc::clone(&self.runner),
            guards: Arc::clone(&self.guards),
            errors: self.errors.clone(),
            notices: self.notices_tx.clone(),
            queue_view: Some(Arc::clone(&self.queue) as Arc<dyn QueuedEvents>),
        }
    }

    fn ensure_executor(&self) -> Result<Arc<Executor<C>>, ConfigError> {
        if let Some(exec) = self.exec.read().as_ref() {
            return Ok(Arc::clone(exec));
        }
        let exec = Arc::new(Executor::new(
            self.config.lock().clone(),
            Context::new(),
            self.clock.clone(),
            self.deps(),
        )?);
        *self.exec.write() = Some(Arc::clone(&exec));
        Ok(exec)
    }

    fn enqueue_posted(&self, posted: Vec<Event>) {
        for event in posted {
            let name = event.event_type().to_string();
            if let Err(err) = self.queue.push(event) {
                (self.errors)(RuntimeError::InternalEventDropped { event: name, source: err });
            }
        }
    }
}

/// Worker loop: drain the queue in order, park when empty, exit when
/// cancelled. Cancellation between events only — the in-flight event always
/// completes.
async fn run_worker<C: Clock>(
    exec: Arc<Executor<C>>,
    queue: Arc<EventQueue>,
    errors: ErrorSink,
    cancel: CancellationToken,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }
        match queue.pop() {
            Some(event) => {
                if let Some(posted) = exec.process(&event) {
                    for ev in posted {
                        let name = ev.event_type().to_string();
                        if let Err(err) = queue.push(ev) {
                            errors(RuntimeError::InternalEventDropped {
                                event: name,
                                source: err,
                            });
                        }
                    }
                }
            }
            None => {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = queue.wait() => {}
                }
            }
        }
    }
    debug!("event worker exited");
}

/// Forward an external source into the queue until it ends or the machine
/// stops.
async fn run_source(
    mut source: Box<dyn EventSource>,
    queue: Arc<EventQueue>,
    errors: ErrorSink,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            next = source.next_event() => {
                let Some(event) = next else { break };
                let name = event.event_type().to_string();
                if let Err(err) = queue.push(event) {
                    errors(RuntimeError::InternalEventDropped { event: name, source: err });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
