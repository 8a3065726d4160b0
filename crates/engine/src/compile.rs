// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start-time compilation of a validated configuration.
//!
//! The config tree is flattened into per-path records plus precomputed
//! ancestor chains. Both caches are immutable after start; the interpreter
//! only reads them. Upward navigation is a map lookup instead of a parent
//! pointer, so the compiled form holds no cycles.

use crate::actions::ActionRef;
use crate::config::{MachineConfig, StateConfig, StateType, TransitionConfig};
use crate::history::HistoryTracker;
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::collections::HashMap;
use sy_core::{EventType, StatePath};

/// Flattened record for one state.
#[derive(Debug, Clone)]
pub struct CompiledState {
    pub path: StatePath,
    pub state_type: StateType,
    pub initial: Option<SmolStr>,
    pub on: IndexMap<EventType, Vec<TransitionConfig>>,
    pub entry: Vec<ActionRef>,
    pub exit: Vec<ActionRef>,
    /// Child ids in declaration order.
    pub children: Vec<SmolStr>,
    /// Full paths of history children, with the deep flag.
    pub history: Vec<(StatePath, bool)>,
}

impl CompiledState {
    pub fn transitions_for(&self, event: &EventType) -> Option<&[TransitionConfig]> {
        self.on.get(event).map(Vec::as_slice)
    }

    /// First non-history child id: the fallback when a history state has no
    /// record.
    fn default_child(&self) -> Option<&SmolStr> {
        self.children.iter().find(|id| !self.history.iter().any(|(p, _)| p.leaf_id() == id.as_str()))
    }
}

/// Result of resolving a transition target (or the machine initial) down to
/// its active leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialEntry {
    /// The state the descent starts from. Equal to the requested path, or
    /// its parent when the requested path is a history pseudo-state.
    pub anchor: StatePath,
    /// States entered strictly below the anchor, outer-to-inner.
    pub entered: Vec<StatePath>,
    /// The resulting active leaves, one per parallel region.
    pub leaves: Vec<StatePath>,
}

/// Immutable caches derived from a validated [`MachineConfig`].
#[derive(Debug)]
pub struct CompiledMachine {
    machine_id: String,
    initial: StatePath,
    states: HashMap<StatePath, CompiledState>,
    /// Path → self and ancestors, innermost first (walk order for candidate
    /// search).
    ancestors: HashMap<StatePath, Vec<StatePath>>,
}

impl CompiledMachine {
    /// Flatten a configuration. The config must already be validated;
    /// compilation itself cannot fail.
    pub fn compile(config: &MachineConfig) -> Self {
        let mut states = HashMap::new();
        let mut ancestors = HashMap::new();
        for (id, state) in &config.states {
            flatten(&StatePath::new(id.as_str()), state, &mut states, &mut ancestors);
        }
        Self {
            machine_id: config.id.clone(),
            initial: StatePath::new(config.initial.as_str()),
            states,
            ancestors,
        }
    }

    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    /// Path of the machine's initial top-level state.
    pub fn initial(&self) -> &StatePath {
        &self.initial
    }

    pub fn state(&self, path: &StatePath) -> Option<&CompiledState> {
        self.states.get(path)
    }

    /// Self and ancestors of `path`, innermost first.
    pub fn ancestor_chain(&self, path: &StatePath) -> &[StatePath] {
        self.ancestors.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Resolve `path` down to its active leaves, consulting recorded history
    /// where the descent lands on a history pseudo-state.
    pub fn resolve_initial(&self, path: &StatePath, history: &HistoryTracker) -> InitialEntry {
        let mut entry = match self.state(path) {
            Some(s) if s.state_type.is_history() => {
                // A history target resolves in its parent's scope; the
                // pseudo-state itself never becomes active.
                let anchor = path.parent().unwrap_or_else(|| path.clone());
                InitialEntry { anchor, entered: Vec::new(), leaves: Vec::new() }
            }
            _ => InitialEntry { anchor: path.clone(), entered: Vec::new(), leaves: Vec::new() },
        };
        if entry.anchor == *path {
            self.descend(path, history, &mut entry);
        } else {
            let anchor = entry.anchor.clone();
            self.enter_history(path, &anchor, history, &mut entry);
        }
        entry
    }

    /// Record everything below `path` (already entered) into `out`.
    fn descend(&self, path: &StatePath, history: &HistoryTracker, out: &mut InitialEntry) {
        let Some(state) = self.state(path) else {
            out.leaves.push(path.clone());
            return;
        };
        match state.state_type {
            StateType::Atomic | StateType::ShallowHistory | StateType::DeepHistory => {
                out.leaves.push(path.clone());
            }
            StateType::Compound => {
                let Some(initial) = &state.initial else {
                    out.leaves.push(path.clone());
                    return;
                };
                let child = path.join(initial);
                match self.state(&child) {
                    Some(c) if c.state_type.is_history() => {
                        self.enter_history(&child, path, history, out)
                    }
                    _ => {
                        out.entered.push(child.clone());
                        self.descend(&child, history, out);
                    }
                }
            }
            StateType::Parallel => {
                for id in &state.children {
                    let child = path.join(id);
                    if self.state(&child).is_some_and(|c| c.state_type.is_history()) {
                        continue;
                    }
                    out.entered.push(child.clone());
                    self.descend(&child, history, out);
                }
            }
        }
    }

    /// Enter `parent` through the history pseudo-state at `hist_path`.
    fn enter_history(
        &self,
        hist_path: &StatePath,
        parent: &StatePath,
        history: &HistoryTracker,
        out: &mut InitialEntry,
    ) {
        let deep = self
            .state(hist_path)
            .is_some_and(|s| s.state_type.is_deep_history());
        match history.restore(hist_path, deep) {
            Some(paths) if deep => {
                // Deep records are full leaf paths; enter every state
                // between the parent and each leaf.
                for leaf in paths {
                    for p in leaf.ancestors() {
                        if parent.is_ancestor_of(&p) && !out.entered.contains(&p) {
                            out.entered.push(p);
                        }
                    }
                    out.leaves.push(leaf);
                }
            }
            Some(paths) => {
                // Shallow records hold the direct child; continue the normal
                // initial descent below it.
                for child in paths {
                    out.entered.push(child.clone());
                    self.descend(&child, history, out);
                }
            }
            None => {
                let fallback = self
                    .state(parent)
                    .and_then(|p| p.default_child())
                    .cloned();
                if let Some(child_id) = fallback {
                    let child = parent.join(&child_id);
                    out.entered.push(child.clone());
                    self.descend(&child, history, out);
                } else {
                    out.leaves.push(parent.clone());
                }
            }
        }
    }
}

fn flatten(
    path: &StatePath,
    state: &StateConfig,
    states: &mut HashMap<StatePath, CompiledState>,
    ancestors: &mut HashMap<StatePath, Vec<StatePath>>,
) {
    let mut chain = path.ancestors();
    chain.reverse();
    ancestors.insert(path.clone(), chain);

    let history = state
        .history_children()
        .map(|(id, deep)| (path.join(id), deep))
        .collect();
    states.insert(
        path.clone(),
        CompiledState {
            path: path.clone(),
            state_type: state.state_type,
            initial: state.initial.clone(),
            on: state.on.clone(),
            entry: state.entry.clone(),
            exit: state.exit.clone(),
            children: state.children.keys().cloned().collect(),
            history,
        },
    );

    for (id, child) in &state.children {
        flatten(&path.join(id), child, states, ancestors);
    }
}

#[cfg(test)]
#[path = "compile_tests.rs"]
mod tests;
