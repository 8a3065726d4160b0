// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action and guard references, the registry they resolve against, and the
//! dispatch seams the runtimes call through.
//!
//! References are a closed variant: a function held directly, or a name
//! resolved against an injected [`Registry`]. Unknown guard names fail
//! closed (evaluate to `false`); unknown action names surface an error to
//! the post-commit sink without rolling back the transition.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::HashMap;
use std::sync::Arc;
use sy_core::{Context, Event};
use thiserror::Error;

/// Serialised stand-in for a function reference. Function refs do not
/// round-trip through snapshots; persistable machines use named refs.
const FUNC_SENTINEL: &str = "#fn";

/// Failure reported by an action body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ActionError(pub String);

impl From<&str> for ActionError {
    fn from(msg: &str) -> Self {
        Self(msg.to_string())
    }
}

impl From<String> for ActionError {
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

/// What an action observes: the shared context and the triggering event.
/// Events posted through the scope are enqueued after the commit completes,
/// behind events already in the queue.
pub struct ActionScope<'a> {
    context: &'a Context,
    event: &'a Event,
    posted: Vec<Event>,
}

impl<'a> ActionScope<'a> {
    pub fn new(context: &'a Context, event: &'a Event) -> Self {
        Self { context, event, posted: Vec::new() }
    }

    pub fn context(&self) -> &Context {
        self.context
    }

    pub fn event(&self) -> &Event {
        self.event
    }

    /// Post an internal event, delivered after this microstep commits.
    pub fn post(&mut self, event: Event) {
        self.posted.push(event);
    }

    pub(crate) fn take_posted(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.posted)
    }
}

pub type ActionFn = dyn Fn(&mut ActionScope<'_>) -> Result<(), ActionError> + Send + Sync;
pub type GuardFn = dyn Fn(&Context, &Event) -> bool + Send + Sync;

/// Reference to an action: a function or a registry name.
#[derive(Clone)]
pub enum ActionRef {
    Named(SmolStr),
    Func(Arc<ActionFn>),
}

impl ActionRef {
    pub fn named(name: impl AsRef<str>) -> Self {
        Self::Named(SmolStr::new(name.as_ref()))
    }

    pub fn func(
        f: impl Fn(&mut ActionScope<'_>) -> Result<(), ActionError> + Send + Sync + 'static,
    ) -> Self {
        Self::Func(Arc::new(f))
    }

    /// Name used in logs and `ActionFailed` errors.
    pub fn label(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Func(_) => FUNC_SENTINEL,
        }
    }
}

impl std::fmt::Debug for ActionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl PartialEq for ActionRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Named(a), Self::Named(b)) => a == b,
            (Self::Func(a), Self::Func(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for ActionRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ActionRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::Named(SmolStr::new(name)))
    }
}

/// Reference to a guard predicate: a function or a registry name.
///
/// Guards must be side-effect-free; `None` on a transition means
/// unconditionally enabled.
#[derive(Clone)]
pub enum GuardRef {
    Named(SmolStr),
    Func(Arc<GuardFn>),
}

impl GuardRef {
    pub fn named(name: impl AsRef<str>) -> Self {
        Self::Named(SmolStr::new(name.as_ref()))
    }

    pub fn func(f: impl Fn(&Context, &Event) -> bool + Send + Sync + 'static) -> Self {
        Self::Func(Arc::new(f))
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Func(_) => FUNC_SENTINEL,
        }
    }
}

impl std::fmt::Debug for GuardRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl PartialEq for GuardRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Named(a), Self::Named(b)) => a == b,
            (Self::Func(a), Self::Func(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for GuardRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for GuardRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::Named(SmolStr::new(name)))
    }
}

/// Named actions and guards available to a machine.
#[derive(Default)]
pub struct Registry {
    actions: HashMap<SmolStr, Arc<ActionFn>>,
    guards: HashMap<SmolStr, Arc<GuardFn>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_action(
        &mut self,
        name: impl AsRef<str>,
        f: impl Fn(&mut ActionScope<'_>) -> Result<(), ActionError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.actions.insert(SmolStr::new(name.as_ref()), Arc::new(f));
        self
    }

    pub fn register_guard(
        &mut self,
        name: impl AsRef<str>,
        f: impl Fn(&Context, &Event) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.guards.insert(SmolStr::new(name.as_ref()), Arc::new(f));
        self
    }

    pub fn action(&self, name: &str) -> Option<Arc<ActionFn>> {
        self.actions.get(name).cloned()
    }

    pub fn guard(&self, name: &str) -> Option<Arc<GuardFn>> {
        self.guards.get(name).cloned()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("actions", &self.actions.len())
            .field("guards", &self.guards.len())
            .finish()
    }
}

/// Executes action references during commit.
pub trait ActionRunner: Send + Sync {
    fn run(&self, action: &ActionRef, scope: &mut ActionScope<'_>) -> Result<(), ActionError>;
}

/// Evaluates guard references during candidate search. Must be read-only.
pub trait GuardEvaluator: Send + Sync {
    fn evaluate(&self, guard: &GuardRef, context: &Context, event: &Event) -> bool;
}

/// Default dispatch: function refs run directly; named refs resolve against
/// the registry. Unknown actions error, unknown guards evaluate to false.
#[derive(Debug, Default)]
pub struct RegistryDispatch {
    registry: Arc<Registry>,
}

impl RegistryDispatch {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}

impl ActionRunner for RegistryDispatch {
    fn run(&self, action: &ActionRef, scope: &mut ActionScope<'_>) -> Result<(), ActionError> {
        match action {
            ActionRef::Func(f) => f(scope),
            ActionRef::Named(name) => match self.registry.action(name) {
                Some(f) => f(scope),
                None => Err(ActionError(format!("unregistered action {name:?}"))),
            },
        }
    }
}

impl GuardEvaluator for RegistryDispatch {
    fn evaluate(&self, guard: &GuardRef, context: &Context, event: &Event) -> bool {
        match guard {
            GuardRef::Func(f) => f(context, event),
            GuardRef::Named(name) => match self.registry.guard(name) {
                Some(f) => f(context, event),
                None => false,
            },
        }
    }
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
