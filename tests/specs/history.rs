// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shallow and deep history restoration through the actor runtime.

use super::support::{p, wait_for_current};
use sy_core::Event;
use sy_engine::{Machine, MachineConfig, StateConfig, TransitionConfig};

fn shallow_machine() -> MachineConfig {
    MachineConfig::new("m", "parent")
        .state(
            "parent",
            StateConfig::compound("child1")
                .on("leave", TransitionConfig::to("away"))
                .child("child1", StateConfig::atomic().on("next", TransitionConfig::to("parent.child2")))
                .child("child2", StateConfig::atomic())
                .child("h", StateConfig::shallow_history()),
        )
        .state("away", StateConfig::atomic().on("back", TransitionConfig::to("parent.h")))
}

#[tokio::test]
async fn shallow_history_restores_last_visited_child() {
    let machine = Machine::new(shallow_machine());
    machine.start().unwrap();

    machine.send(Event::new("next")).unwrap();
    machine.send(Event::new("leave")).unwrap();
    wait_for_current(&machine, &[p("away")]).await;

    machine.send(Event::new("back")).unwrap();
    wait_for_current(&machine, &[p("parent.child2")]).await;
    machine.stop().await;
}

#[tokio::test]
async fn shallow_history_without_record_uses_default_child() {
    let machine = Machine::new(shallow_machine());
    machine.start().unwrap();
    wait_for_current(&machine, &[p("parent.child1")]).await;

    // Never visited child2; leave and come back via history
    machine.send(Event::new("leave")).unwrap();
    machine.send(Event::new("back")).unwrap();
    wait_for_current(&machine, &[p("parent.child1")]).await;
    machine.stop().await;
}

#[tokio::test]
async fn deep_history_restores_nested_configuration() {
    let config = MachineConfig::new("m", "parent")
        .state(
            "parent",
            StateConfig::compound("sub")
                .on("leave", TransitionConfig::to("away"))
                .child(
                    "sub",
                    StateConfig::compound("x")
                        .child("x", StateConfig::atomic().on("go", TransitionConfig::to("parent.sub.y")))
                        .child("y", StateConfig::atomic()),
                )
                .child("hd", StateConfig::deep_history()),
        )
        .state("away", StateConfig::atomic().on("back", TransitionConfig::to("parent.hd")));
    let machine = Machine::new(config);
    machine.start().unwrap();

    machine.send(Event::new("go")).unwrap();
    machine.send(Event::new("leave")).unwrap();
    wait_for_current(&machine, &[p("away")]).await;

    machine.send(Event::new("back")).unwrap();
    wait_for_current(&machine, &[p("parent.sub.y")]).await;
    machine.stop().await;
}
