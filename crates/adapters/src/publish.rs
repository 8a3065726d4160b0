// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Post-commit publishers.

use sy_core::Event;
use sy_engine::{Publisher, TransitionMeta};
use tokio::sync::mpsc;

/// Publishes transitions as structured log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPublisher;

impl TracingPublisher {
    pub fn new() -> Self {
        Self
    }
}

impl Publisher for TracingPublisher {
    fn publish(&self, event: &Event, meta: &TransitionMeta) {
        tracing::info!(
            machine = %meta.machine_id,
            event = %event,
            transition = %meta.transition,
            timestamp_ms = meta.timestamp_ms,
            "transition published"
        );
    }
}

/// Forwards each transition over an unbounded channel, e.g. to an external
/// event bus bridge. A dropped receiver simply stops delivery.
#[derive(Debug)]
pub struct ChannelPublisher {
    tx: mpsc::UnboundedSender<(Event, TransitionMeta)>,
}

impl ChannelPublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(Event, TransitionMeta)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Publisher for ChannelPublisher {
    fn publish(&self, event: &Event, meta: &TransitionMeta) {
        let _ = self.tx.send((event.clone(), meta.clone()));
    }
}

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;
