// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded-queue backpressure.

use super::support::toggle_machine;
use sy_core::Event;
use sy_engine::{Machine, MachineOptions, SendError};

#[tokio::test]
async fn nth_plus_one_send_reports_queue_full() {
    let capacity = 8;
    let machine = Machine::with_options(
        toggle_machine(),
        MachineOptions::new().queue_size(capacity),
    );
    // No consumer: the machine is never started
    for _ in 0..capacity {
        machine.send(Event::new("start")).unwrap();
    }
    assert_eq!(machine.send(Event::new("start")), Err(SendError::QueueFull));
}

#[tokio::test]
async fn concurrent_producers_see_exact_capacity() {
    let capacity = 100;
    let machine = std::sync::Arc::new(Machine::with_options(
        toggle_machine(),
        MachineOptions::new().queue_size(capacity),
    ));

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let machine = std::sync::Arc::clone(&machine);
        tasks.push(tokio::spawn(async move {
            let mut accepted = 0usize;
            for _ in 0..20 {
                // Producers stop on backpressure rather than spin
                match machine.send(Event::new("start")) {
                    Ok(()) => accepted += 1,
                    Err(SendError::QueueFull) => break,
                }
            }
            accepted
        }));
    }

    let mut total = 0;
    for task in tasks {
        total += task.await.unwrap();
    }
    assert_eq!(total, capacity);
}
