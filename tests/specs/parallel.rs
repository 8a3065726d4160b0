// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parallel-region semantics through the actor runtime.

use super::support::{p, wait_for_current};
use sy_core::Event;
use sy_engine::{Machine, MachineConfig, StateConfig, TransitionConfig};

fn parallel_machine() -> MachineConfig {
    MachineConfig::new("m", "p")
        .state(
            "p",
            StateConfig::parallel()
                .with_initial("r1")
                .on("halt", TransitionConfig::to("off"))
                .child(
                    "r1",
                    StateConfig::compound("a")
                        .child("a", StateConfig::atomic().on("e1", TransitionConfig::to("p.r1.b")))
                        .child("b", StateConfig::atomic()),
                )
                .child(
                    "r2",
                    StateConfig::compound("a")
                        .child("a", StateConfig::atomic().on("e2", TransitionConfig::to("p.r2.b")))
                        .child("b", StateConfig::atomic()),
                ),
        )
        .state("off", StateConfig::atomic().on("resume", TransitionConfig::to("p")))
}

#[tokio::test]
async fn start_activates_every_region() {
    let machine = Machine::new(parallel_machine());
    machine.start().unwrap();
    wait_for_current(&machine, &[p("p.r1.a"), p("p.r2.a")]).await;
    machine.stop().await;
}

#[tokio::test]
async fn regions_advance_independently() {
    let machine = Machine::new(parallel_machine());
    machine.start().unwrap();

    machine.send(Event::new("e1")).unwrap();
    wait_for_current(&machine, &[p("p.r1.b"), p("p.r2.a")]).await;

    machine.send(Event::new("e2")).unwrap();
    wait_for_current(&machine, &[p("p.r1.b"), p("p.r2.b")]).await;
    machine.stop().await;
}

#[tokio::test]
async fn leaving_the_parallel_collapses_to_one_leaf() {
    let machine = Machine::new(parallel_machine());
    machine.start().unwrap();

    machine.send(Event::new("e1")).unwrap();
    machine.send(Event::new("halt")).unwrap();
    wait_for_current(&machine, &[p("off")]).await;

    // Re-entry restarts every region at its default
    machine.send(Event::new("resume")).unwrap();
    wait_for_current(&machine, &[p("p.r1.a"), p("p.r2.a")]).await;
    machine.stop().await;
}
