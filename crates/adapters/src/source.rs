// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel-backed event source.

use async_trait::async_trait;
use sy_core::Event;
use sy_engine::EventSource;
use tokio::sync::mpsc;

/// Adapts an `mpsc` receiver into the machine's event-source seam. The
/// forwarder stops when every sender is dropped.
#[derive(Debug)]
pub struct ChannelEventSource {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl ChannelEventSource {
    pub fn new() -> (mpsc::UnboundedSender<Event>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    pub fn from_receiver(rx: mpsc::UnboundedReceiver<Event>) -> Self {
        Self { rx }
    }
}

#[async_trait]
impl EventSource for ChannelEventSource {
    async fn next_event(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
