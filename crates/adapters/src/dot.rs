// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graphviz DOT rendering of a machine configuration.
//!
//! Compound and parallel states become cluster subgraphs; atomic and
//! history states become nodes; transitions become labelled edges. The
//! active leaves and their ancestors are highlighted. Edges between
//! clusters anchor on a representative leaf and carry `ltail`/`lhead`,
//! which requires `compound=true`.

use std::collections::HashSet;
use std::fmt::Write;
use sy_core::StatePath;
use sy_engine::{MachineConfig, StateConfig, StateType, Visualizer};

const ACTIVE_FILL: &str = "#b3d9ff";

#[derive(Debug, Clone, Copy, Default)]
pub struct DotVisualizer;

impl DotVisualizer {
    pub fn new() -> Self {
        Self
    }
}

impl Visualizer for DotVisualizer {
    fn render(&self, config: &MachineConfig, current: &[StatePath]) -> String {
        let active = active_set(current);
        let mut out = String::new();
        let _ = writeln!(out, "digraph {:?} {{", config.id);
        let _ = writeln!(out, "  compound=true;");
        let _ = writeln!(out, "  rankdir=LR;");
        let _ = writeln!(out, "  node [shape=box, style=rounded];");

        for (id, state) in &config.states {
            render_state(&mut out, &StatePath::new(id.as_str()), state, &active, 1);
        }
        for (id, state) in &config.states {
            render_edges(&mut out, config, &StatePath::new(id.as_str()), state);
        }

        out.push_str("}\n");
        out
    }
}

/// Leaves plus every ancestor.
fn active_set(current: &[StatePath]) -> HashSet<StatePath> {
    let mut active = HashSet::new();
    for leaf in current {
        for p in leaf.ancestors() {
            active.insert(p);
        }
    }
    active
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn render_state(
    out: &mut String,
    path: &StatePath,
    state: &StateConfig,
    active: &HashSet<StatePath>,
    depth: usize,
) {
    let is_active = active.contains(path);
    match state.state_type {
        StateType::Compound | StateType::Parallel => {
            indent(out, depth);
            let _ = writeln!(out, "subgraph \"cluster_{path}\" {{");
            indent(out, depth + 1);
            let _ = writeln!(out, "label={:?};", path.leaf_id());
            if state.state_type == StateType::Parallel {
                indent(out, depth + 1);
                let _ = writeln!(out, "style=dashed;");
            }
            if is_active {
                indent(out, depth + 1);
                let _ = writeln!(out, "color=blue;");
            }
            for (id, child) in &state.children {
                render_state(out, &path.join(id), child, active, depth + 1);
            }
            indent(out, depth);
            out.push_str("}\n");
        }
        StateType::Atomic | StateType::ShallowHistory | StateType::DeepHistory => {
            let label = match state.state_type {
                StateType::ShallowHistory => "H".to_string(),
                StateType::DeepHistory => "H*".to_string(),
                _ => path.leaf_id().to_string(),
            };
            indent(out, depth);
            if is_active {
                let _ = writeln!(
                    out,
                    "{:?} [label={:?}, style=\"rounded,filled\", fillcolor={:?}];",
                    path.as_str(),
                    label,
                    ACTIVE_FILL
                );
            } else {
                let _ = writeln!(out, "{:?} [label={:?}];", path.as_str(), label);
            }
        }
    }
}

fn render_edges(out: &mut String, config: &MachineConfig, path: &StatePath, state: &StateConfig) {
    for (event, transitions) in &state.on {
        for t in transitions {
            let src_rep = representative(config, path);
            let tgt_rep = representative(config, &t.target);
            indent(out, 1);
            let _ = write!(
                out,
                "{:?} -> {:?} [label={:?}",
                src_rep.as_str(),
                tgt_rep.as_str(),
                event.as_str()
            );
            if src_rep != *path {
                let _ = write!(out, ", ltail=\"cluster_{path}\"");
            }
            if tgt_rep != t.target {
                let _ = write!(out, ", lhead=\"cluster_{}\"", t.target);
            }
            out.push_str("];\n");
        }
    }
    for (id, child) in &state.children {
        render_edges(out, config, &path.join(id), child);
    }
}

/// Node that stands in for a state when it is drawn as a cluster: the
/// first leaf reached by walking first children.
fn representative(config: &MachineConfig, path: &StatePath) -> StatePath {
    let mut path = path.clone();
    loop {
        let Some(state) = config.state_at(&path) else { return path };
        match state.children.keys().next() {
            Some(first) if state.state_type.is_composite() => path = path.join(first),
            _ => return path,
        }
    }
}

#[cfg(test)]
#[path = "dot_tests.rs"]
mod tests;
