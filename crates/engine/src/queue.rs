// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event queues for the two runtimes.
//!
//! Both queues are lock-guarded collections with an explicit capacity or
//! drain policy, so pending events can be snapshotted for persistence and
//! re-seeded on restore — something an opaque channel cannot offer.

use crate::error::SendError;
use parking_lot::Mutex;
use std::collections::{BinaryHeap, VecDeque};
use sy_core::Event;
use tokio::sync::Notify;

/// Read-only view of pending events, used when building snapshots.
pub trait QueuedEvents: Send + Sync {
    fn queued_events(&self) -> Vec<Event>;
}

/// Bounded FIFO queue feeding the actor worker.
///
/// `push` is non-blocking and fails with `QueueFull` at capacity; the
/// worker parks on [`EventQueue::wait`] when the queue is empty.
#[derive(Debug)]
pub struct EventQueue {
    items: Mutex<VecDeque<Event>>,
    capacity: usize,
    notify: Notify,
}

impl EventQueue {
    pub fn new(capacity: usize) -> Self {
        Self { items: Mutex::new(VecDeque::new()), capacity, notify: Notify::new() }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Non-blocking enqueue. Full queue is a backpressure signal, not an
    /// internal retry.
    pub fn push(&self, event: Event) -> Result<(), SendError> {
        {
            let mut items = self.items.lock();
            if items.len() >= self.capacity {
                return Err(SendError::QueueFull);
            }
            items.push_back(event);
        }
        self.notify.notify_one();
        Ok(())
    }

    pub fn pop(&self) -> Option<Event> {
        self.items.lock().pop_front()
    }

    /// Wait until a push signals new work. A permit stored while nobody was
    /// waiting is consumed immediately.
    pub async fn wait(&self) {
        self.notify.notified().await;
    }

    /// Replace pending events wholesale (restore path).
    pub fn replace(&self, events: Vec<Event>) {
        let mut items = self.items.lock();
        items.clear();
        items.extend(events);
    }
}

impl QueuedEvents for EventQueue {
    fn queued_events(&self) -> Vec<Event> {
        self.items.lock().iter().cloned().collect()
    }
}

#[derive(Debug)]
struct TickEntry {
    priority: u32,
    seq: u64,
    event: Event,
}

impl PartialEq for TickEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for TickEntry {}

impl Ord for TickEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Max-heap: higher priority first, then earlier submission.
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for TickEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue for the tick runtime.
///
/// Pop order is deterministic: priority descending, submission sequence
/// ascending within a priority band. A sequence watermark taken at the top
/// of a tick defers events submitted mid-tick to the next tick.
#[derive(Debug, Default)]
pub struct TickQueue {
    inner: Mutex<TickQueueInner>,
}

#[derive(Debug, Default)]
struct TickQueueInner {
    heap: BinaryHeap<TickEntry>,
    next_seq: u64,
}

impl TickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event, priority: u32) {
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.heap.push(TickEntry { priority, seq, event });
    }

    pub fn len(&self) -> usize {
        self.inner.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().heap.is_empty()
    }

    /// Sequence watermark: entries with `seq` below this were submitted
    /// before now.
    pub fn watermark(&self) -> u64 {
        self.inner.lock().next_seq
    }

    /// Pop up to `max` entries submitted before `watermark`, in priority
    /// order.
    pub fn drain_tick(&self, max: usize, watermark: u64) -> Vec<Event> {
        let mut inner = self.inner.lock();
        let mut batch = Vec::new();
        let mut deferred = Vec::new();
        while batch.len() < max {
            let Some(entry) = inner.heap.pop() else { break };
            if entry.seq < watermark {
                batch.push(entry.event);
            } else {
                deferred.push(entry);
            }
        }
        for entry in deferred {
            inner.heap.push(entry);
        }
        batch
    }
}

impl QueuedEvents for TickQueue {
    fn queued_events(&self) -> Vec<Event> {
        let inner = self.inner.lock();
        let mut entries: Vec<_> =
            inner.heap.iter().map(|e| (e.priority, e.seq, e.event.clone())).collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        entries.into_iter().map(|(_, _, event)| event).collect()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
