// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end transitions through the actor runtime.

use super::support::{p, toggle_machine, wait_for_current};
use serde_json::{json, Value};
use sy_core::Event;
use sy_engine::{
    ActionRef, GuardRef, Machine, MachineConfig, StateConfig, TransitionConfig,
};

#[tokio::test]
async fn start_then_stop_returns_to_idle() {
    let machine = Machine::new(toggle_machine());
    machine.start().unwrap();

    machine.send(Event::new("start")).unwrap();
    machine.send(Event::new("stop")).unwrap();

    wait_for_current(&machine, &[p("idle")]).await;
    machine.stop().await;
}

#[tokio::test]
async fn fresh_start_enters_nested_initial_child() {
    let config = MachineConfig::new("m", "parent").state(
        "parent",
        StateConfig::compound("child1")
            .child("child1", StateConfig::atomic().on("switch", TransitionConfig::to("parent.child2")))
            .child("child2", StateConfig::atomic()),
    );
    let machine = Machine::new(config);
    machine.start().unwrap();
    wait_for_current(&machine, &[p("parent.child1")]).await;

    machine.send(Event::new("switch")).unwrap();
    wait_for_current(&machine, &[p("parent.child2")]).await;
    machine.stop().await;
}

#[tokio::test]
async fn higher_priority_transition_wins() {
    let config = MachineConfig::new("m", "idle")
        .state(
            "idle",
            StateConfig::atomic()
                .on("tick", TransitionConfig::to("b").priority(1))
                .on("tick", TransitionConfig::to("a").priority(10)),
        )
        .state("a", StateConfig::atomic())
        .state("b", StateConfig::atomic());
    let machine = Machine::new(config);
    machine.start().unwrap();

    machine.send(Event::new("tick")).unwrap();
    wait_for_current(&machine, &[p("a")]).await;
    machine.stop().await;
}

#[tokio::test]
async fn guard_stops_action_after_limit() {
    let config = MachineConfig::new("m", "idle").state(
        "idle",
        StateConfig::atomic().on(
            "tick",
            TransitionConfig::to("idle")
                .guarded(GuardRef::func(|ctx, _| {
                    ctx.get("count").and_then(|v| v.as_i64()).unwrap_or(0) < 3
                }))
                .action(ActionRef::func(|scope| {
                    scope.context().update("count", |v| {
                        json!(v.and_then(Value::as_i64).unwrap_or(0) + 1)
                    });
                    Ok(())
                })),
        ),
    );
    let machine = Machine::new(config);
    machine.start().unwrap();

    for _ in 0..5 {
        machine.send(Event::new("tick")).unwrap();
    }
    for _ in 0..200 {
        if machine.context().and_then(|c| c.get("count")) == Some(json!(3)) {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    machine.stop().await;

    assert_eq!(machine.context().unwrap().get("count"), Some(json!(3)));
    assert_eq!(machine.current(), vec![p("idle")]);
}

#[tokio::test]
async fn active_configuration_stays_a_single_leaf_without_parallel() {
    let machine = Machine::new(toggle_machine());
    machine.start().unwrap();

    for event in ["start", "stop", "start", "bogus", "stop"] {
        machine.send(Event::new(event)).unwrap();
    }
    wait_for_current(&machine, &[p("idle")]).await;
    machine.stop().await;
    assert_eq!(machine.current().len(), 1);
}
