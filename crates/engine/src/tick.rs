// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-cadence tick runtime for deterministic, replayable execution.
//!
//! Events queue with an explicit priority and are drained in batches at
//! tick boundaries, highest priority first and FIFO within a priority.
//! Events submitted while a tick is draining are deferred to the next tick.
//! Given the same configuration, context, and per-tick insertion schedule,
//! two runs produce identical state sequences; [`TickMachine::step`] drives
//! one tick synchronously for replay and tests, while [`TickMachine::start`]
//! runs the same path off a wall-clock interval timer.

use crate::config::MachineConfig;
use crate::error::ConfigError;
use crate::executor::{Executor, ExecutorDeps};
use crate::hooks::{default_error_sink, Hooks};
use crate::machine::MachineOptions;
use crate::actions::{ActionRunner, GuardEvaluator, RegistryDispatch};
use crate::queue::{QueuedEvents, TickQueue};
use crate::snapshot::MachineSnapshot;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sy_core::{Clock, Context, Event, StatePath, SystemClock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cadence and batch limits for the tick scheduler.
#[derive(Debug, Clone, Copy)]
pub struct TickConfig {
    /// Duration between tick boundaries.
    pub tick_rate: Duration,
    /// Cap on events drained per tick; the rest wait for the next tick.
    pub max_events_per_tick: usize,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { tick_rate: Duration::from_millis(16), max_events_per_tick: 64 }
    }
}

struct TickShared<C: Clock> {
    exec: Arc<Executor<C>>,
    queue: Arc<TickQueue>,
    max_events_per_tick: usize,
    ticks: AtomicU64,
}

impl<C: Clock> TickShared<C> {
    /// One tick: enter the initial configuration if needed, drain the
    /// eligible batch, count the tick exactly once.
    fn step(&self) -> usize {
        if !self.exec.is_entered() {
            let posted = self.exec.enter_initial();
            for event in posted {
                self.queue.push(event, 0);
            }
        }
        let watermark = self.queue.watermark();
        let batch = self.queue.drain_tick(self.max_events_per_tick, watermark);
        let drained = batch.len();
        for event in batch {
            if let Some(posted) = self.exec.process(&event) {
                // Posted events sequence after the watermark: next tick.
                for ev in posted {
                    self.queue.push(ev, 0);
                }
            }
        }
        self.ticks.fetch_add(1, Ordering::SeqCst);
        drained
    }
}

/// Tick-driven statechart runtime sharing the actor runtime's interpreter.
pub struct TickMachine<C: Clock = SystemClock> {
    shared: Arc<TickShared<C>>,
    tick_rate: Duration,
    errors: crate::hooks::ErrorSink,
    pending_hooks: Mutex<Option<(Hooks, tokio::sync::mpsc::UnboundedReceiver<crate::hooks::CommitNotice>)>>,
    running: Mutex<bool>,
    cancel: Mutex<CancellationToken>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl TickMachine<SystemClock> {
    pub fn new(config: MachineConfig, tick_config: TickConfig) -> Result<Self, ConfigError> {
        Self::with_options(config, tick_config, MachineOptions::default())
    }

    pub fn with_options(
        config: MachineConfig,
        tick_config: TickConfig,
        options: MachineOptions,
    ) -> Result<Self, ConfigError> {
        Self::with_clock(config, tick_config, options, SystemClock)
    }
}

impl<C: Clock + 'static> TickMachine<C> {
    /// Validate, compile, and assemble the runtime. `queue_size` in the
    /// options is ignored: the tick queue bounds work per tick, not per
    /// queue.
    pub fn with_clock(
        config: MachineConfig,
        tick_config: TickConfig,
        mut options: MachineOptions,
        clock: C,
    ) -> Result<Self, ConfigError> {
        let queue = Arc::new(TickQueue::new());
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
            let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
            (Some(tx), Some((hooks, rx)))
        };

        let deps = ExecutorDeps {
            runner,
            guards,
            errors: errors.clone(),
            notices: notices_tx,
            queue_view: Some(Arc::clone(&queue) as Arc<dyn QueuedEvents>),
        };
        let exec = Arc::new(Executor::new(config, Context::new(), clock, deps)?);

        Ok(Self {
            shared: Arc::new(TickShared {
                exec,
                queue,
                max_events_per_tick: tick_config.max_events_per_tick,
                ticks: AtomicU64::new(0),
            }),
            tick_rate: tick_config.tick_rate,
            errors,
            pending_hooks: Mutex::new(pending_hooks),
            running: Mutex::new(false),
            cancel: Mutex::new(CancellationToken::new()),
            timer: Mutex::new(None),
        })
    }

    pub fn machine_id(&self) -> &str {
        self.shared.exec.machine_id()
    }

    pub fn current(&self) -> Vec<StatePath> {
        self.shared.exec.current()
    }

    pub fn context(&self) -> Context {
        self.shared.exec.context().clone()
    }

    /// Number of completed ticks. Increments exactly once per tick,
    /// regardless of how many events the tick drained.
    pub fn tick_count(&self) -> u64 {
        self.shared.ticks.load(Ordering::SeqCst)
    }

    pub fn pending_events(&self) -> usize {
        self.shared.queue.len()
    }

    /// Queue an event at default priority for the next tick.
    pub fn send(&self, event: Event) {
        self.shared.queue.push(event, 0);
    }

    /// Queue an event with an explicit priority; higher drains first,
    /// submission order breaks ties.
    pub fn send_with_priority(&self, event: Event, priority: u32) {
        self.shared.queue.push(event, priority);
    }

    /// Drive one tick synchronously. The first step enters the initial
    /// configuration. Returns the number of events drained.
    pub fn step(&self) -> usize {
        self.spawn_hook_task();
        self.shared.step()
    }

    /// Spawn the interval timer; each firing runs the same path as
    /// [`TickMachine::step`]. Idempotent while running.
    pub fn start(&self) {
        let mut running = self.running.lock();
        if *running {
            return;
        }
        self.spawn_hook_task();

        let cancel = CancellationToken::new();
        *self.cancel.lock() = cancel.clone();
        *self.timer.lock() =
            Some(tokio::spawn(run_timer(Arc::clone(&self.shared), self.tick_rate, cancel)));
        *running = true;
    }

    /// Stop at the next tick boundary. Idempotent.
    pub async fn stop(&self) {
        let handle = {
            let mut running = self.running.lock();
            if !*running {
                return;
            }
            *running = false;
            self.cancel.lock().cancel();
            self.timer.lock().take()
        };
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        debug!(machine = %self.machine_id(), "tick scheduler stopped");
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        self.shared.exec.snapshot()
    }

    fn spawn_hook_task(&self) {
        let mut pending = self.pending_hooks.lock();
        if pending.is_none() {
            return;
        }
        // Without a runtime (pure replay), notices stay queued until one
        // exists.
        let Ok(handle) = tokio::runtime::Handle::try_current() else { return };
        if let Some((hooks, rx)) = pending.take() {
            handle.spawn(hooks.run(rx, self.errors.clone()));
        }
    }
}

async fn run_timer<C: Clock>(
    shared: Arc<TickShared<C>>,
    tick_rate: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(tick_rate);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                shared.step();
            }
        }
    }
    debug!("tick timer exited");
}

#[cfg(test)]
#[path = "tick_tests.rs"]
mod tests;
