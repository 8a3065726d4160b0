// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Visualiser and publisher adapters wired through the runtime.

use super::support::{p, toggle_machine, wait_for_current};
use std::sync::Arc;
use sy_adapters::{ChannelEventSource, ChannelPublisher, DotVisualizer};
use sy_core::Event;
use sy_engine::{Machine, MachineOptions};

#[tokio::test]
async fn render_marks_active_states() {
    let machine = Machine::with_options(
        toggle_machine(),
        MachineOptions::new().visualizer(Arc::new(DotVisualizer::new())),
    );
    machine.start().unwrap();
    machine.send(Event::new("start")).unwrap();
    wait_for_current(&machine, &[p("active")]).await;
    machine.stop().await;

    let dot = machine.render().unwrap();
    assert!(dot.contains("digraph \"m\""));
    assert!(dot.contains("\"active\" [label=\"active\", style=\"rounded,filled\""));
    assert!(dot.contains("\"idle\" [label=\"idle\"];"));
}

#[tokio::test]
async fn publisher_reports_src_arrow_tgt() {
    let (publisher, mut rx) = ChannelPublisher::new();
    let machine = Machine::with_options(
        toggle_machine(),
        MachineOptions::new().publisher(Arc::new(publisher)),
    );
    machine.start().unwrap();
    machine.send(Event::new("start")).unwrap();
    wait_for_current(&machine, &[p("active")]).await;
    machine.stop().await;

    let (event, meta) = rx.recv().await.unwrap();
    assert_eq!(event.event_type().as_str(), "start");
    assert_eq!(meta.machine_id, "m");
    assert_eq!(meta.transition, "idle→active");
    assert!(meta.timestamp_ms > 0);
}

#[tokio::test]
async fn channel_source_drives_the_machine() {
    let (tx, source) = ChannelEventSource::new();
    let machine = Machine::with_options(
        toggle_machine(),
        MachineOptions::new().event_source(Box::new(source)),
    );
    machine.start().unwrap();

    tx.send(Event::new("start")).unwrap();
    wait_for_current(&machine, &[p("active")]).await;
    machine.stop().await;
}
