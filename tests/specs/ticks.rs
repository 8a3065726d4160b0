// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Determinism and batching in the tick runtime.

use super::support::{p, toggle_machine};
use std::time::Duration;
use sy_core::{Event, StatePath};
use sy_engine::{TickConfig, TickMachine};

fn tick_machine(max_per_tick: usize) -> TickMachine {
    let config =
        TickConfig { tick_rate: Duration::from_millis(5), max_events_per_tick: max_per_tick };
    match TickMachine::new(toggle_machine(), config) {
        Ok(machine) => machine,
        Err(err) => panic!("config should validate: {err}"),
    }
}

#[test]
fn identical_schedules_produce_identical_state_sequences() {
    let schedule: &[&[(&str, u32)]] = &[
        &[("start", 2), ("stop", 2)],
        &[("start", 0)],
        &[],
        &[("stop", 7), ("start", 7)],
    ];

    let run = || -> Vec<Vec<StatePath>> {
        let machine = tick_machine(16);
        let mut sequence = Vec::new();
        for tick in schedule {
            for (event, priority) in *tick {
                machine.send_with_priority(Event::new(*event), *priority);
            }
            machine.step();
            sequence.push(machine.current());
        }
        sequence
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
    // Same-priority events keep submission order: stop then start per tick 4
    assert_eq!(first.last().unwrap(), &vec![p("active")]);
}

#[test]
fn priority_bands_drain_highest_first() {
    let machine = tick_machine(16);
    machine.step(); // enter idle

    machine.send_with_priority(Event::new("stop"), 1);
    machine.send_with_priority(Event::new("start"), 10);

    machine.step();
    // "start" ran first (priority 10), then "stop" returned to idle
    assert_eq!(machine.current(), vec![p("idle")]);
    assert_eq!(machine.tick_count(), 2);
}

#[test]
fn batch_cap_carries_overflow_to_later_ticks() {
    let machine = tick_machine(2);
    machine.step();

    for event in ["start", "stop", "start"] {
        machine.send(Event::new(event));
    }
    assert_eq!(machine.step(), 2);
    assert_eq!(machine.pending_events(), 1);
    assert_eq!(machine.step(), 1);
    assert_eq!(machine.current(), vec![p("active")]);
}

#[tokio::test]
async fn wall_clock_timer_matches_manual_stepping_semantics() {
    let machine = tick_machine(16);
    machine.send(Event::new("start"));
    machine.start();

    tokio::time::sleep(Duration::from_millis(40)).await;
    machine.stop().await;

    assert_eq!(machine.current(), vec![p("active")]);
    assert!(machine.tick_count() >= 1);
}
