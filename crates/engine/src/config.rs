// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative statechart configuration.
//!
//! A machine is a tree of named states. States and children are kept in
//! insertion-ordered maps: the key is the state id (unique within its parent
//! by construction), the order is declaration order, which transition
//! selection and initial-child fallback both rely on.

use crate::actions::{ActionRef, GuardRef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use sy_core::{EventType, StatePath};

/// Closed set of state kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateType {
    Atomic,
    Compound,
    Parallel,
    ShallowHistory,
    DeepHistory,
}

sy_core::simple_display! {
    StateType {
        Atomic => "atomic",
        Compound => "compound",
        Parallel => "parallel",
        ShallowHistory => "shallow-history",
        DeepHistory => "deep-history",
    }
}

impl StateType {
    /// Compound or parallel: has children and an active decomposition.
    pub fn is_composite(self) -> bool {
        matches!(self, Self::Compound | Self::Parallel)
    }

    pub fn is_history(self) -> bool {
        matches!(self, Self::ShallowHistory | Self::DeepHistory)
    }

    pub fn is_deep_history(self) -> bool {
        matches!(self, Self::DeepHistory)
    }
}

/// One transition record: where to go on an event, under what condition,
/// with what effects, and at what priority.
///
/// The triggering event is the key of the owning state's `on` table.
/// Targets are fully-qualified dot-paths. Higher priority wins; ties break
/// by source depth (innermost first), then declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    pub target: StatePath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<GuardRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionRef>,
    #[serde(default)]
    pub priority: u32,
}

impl TransitionConfig {
    pub fn to(target: impl AsRef<str>) -> Self {
        Self {
            target: StatePath::new(target.as_ref()),
            guard: None,
            actions: Vec::new(),
            priority: 0,
        }
    }

    pub fn guarded(mut self, guard: GuardRef) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn action(mut self, action: ActionRef) -> Self {
        self.actions.push(action);
        self
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}

/// Configuration of a single state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(rename = "type", default)]
    pub state_type: StateType,
    /// Direct-child id entered by default. Required for composite states.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<SmolStr>,
    /// Event type → ordered transition records.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub on: IndexMap<EventType, Vec<TransitionConfig>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<ActionRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exit: Vec<ActionRef>,
    /// Child id → child state, in declaration order. Forbidden for atomic
    /// and history states.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<SmolStr, StateConfig>,
}

impl Default for StateType {
    fn default() -> Self {
        Self::Atomic
    }
}

impl StateConfig {
    pub fn atomic() -> Self {
        Self::default()
    }

    pub fn compound(initial: impl AsRef<str>) -> Self {
        Self {
            state_type: StateType::Compound,
            initial: Some(SmolStr::new(initial.as_ref())),
            ..Self::default()
        }
    }

    pub fn parallel() -> Self {
        Self { state_type: StateType::Parallel, ..Self::default() }
    }

    pub fn shallow_history() -> Self {
        Self { state_type: StateType::ShallowHistory, ..Self::default() }
    }

    pub fn deep_history() -> Self {
        Self { state_type: StateType::DeepHistory, ..Self::default() }
    }

    pub fn with_initial(mut self, initial: impl AsRef<str>) -> Self {
        self.initial = Some(SmolStr::new(initial.as_ref()));
        self
    }

    pub fn on(mut self, event: impl Into<EventType>, transition: TransitionConfig) -> Self {
        self.on.entry(event.into()).or_default().push(transition);
        self
    }

    pub fn entry_action(mut self, action: ActionRef) -> Self {
        self.entry.push(action);
        self
    }

    pub fn exit_action(mut self, action: ActionRef) -> Self {
        self.exit.push(action);
        self
    }

    pub fn child(mut self, id: impl AsRef<str>, child: StateConfig) -> Self {
        self.children.insert(SmolStr::new(id.as_ref()), child);
        self
    }

    /// Transitions declared for an event type, if any.
    pub fn transitions_for(&self, event: &EventType) -> Option<&[TransitionConfig]> {
        self.on.get(event).map(Vec::as_slice)
    }

    /// Ids of history children, with their depth flag.
    pub fn history_children(&self) -> impl Iterator<Item = (&SmolStr, bool)> {
        self.children
            .iter()
            .filter(|(_, c)| c.state_type.is_history())
            .map(|(id, c)| (id, c.state_type.is_deep_history()))
    }
}

/// Top-level machine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    pub id: String,
    /// Id of the top-level state entered at start.
    pub initial: SmolStr,
    /// Top-level state id → state, in declaration order.
    pub states: IndexMap<SmolStr, StateConfig>,
}

impl MachineConfig {
    pub fn new(id: impl Into<String>, initial: impl AsRef<str>) -> Self {
        Self {
            id: id.into(),
            initial: SmolStr::new(initial.as_ref()),
            states: IndexMap::new(),
        }
    }

    pub fn state(mut self, id: impl AsRef<str>, state: StateConfig) -> Self {
        self.states.insert(SmolStr::new(id.as_ref()), state);
        self
    }

    /// Walk a dot-path down the tree, `None` if any segment is missing.
    pub fn state_at(&self, path: &StatePath) -> Option<&StateConfig> {
        let mut segments = path.segments();
        let root = segments.next()?;
        let mut state = self.states.get(root)?;
        for segment in segments {
            state = state.children.get(segment)?;
        }
        Some(state)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
