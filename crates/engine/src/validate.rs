// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structural validation of a machine configuration.
//!
//! Checks run in a fixed order and stop at the first failure. Validation is
//! pure: caches are built by the runtime at start, not here. Negative
//! priorities never reach this layer (the config model rejects them at
//! deserialisation).

use crate::config::{MachineConfig, StateConfig};
use crate::error::ConfigError;
use std::collections::HashSet;
use sy_core::StatePath;

/// Validate a machine configuration.
///
/// Order of checks:
/// 1. machine id, initial, and state table non-empty
/// 2. the initial id names a top-level state
/// 3. recursive per-state shape validation (children, initial, `on` keys)
/// 4. transition target syntax, resolvability, and uniqueness
/// 5. reachability of every top-level state from the initial state
pub fn validate(config: &MachineConfig) -> Result<(), ConfigError> {
    if config.id.trim().is_empty() {
        return Err(ConfigError::EmptyMachineId);
    }
    if config.initial.trim().is_empty() {
        return Err(ConfigError::EmptyInitial { machine: config.id.clone() });
    }
    if config.states.is_empty() {
        return Err(ConfigError::NoStates { machine: config.id.clone() });
    }
    if !config.states.contains_key(config.initial.as_str()) {
        return Err(ConfigError::UnknownInitial {
            machine: config.id.clone(),
            initial: config.initial.to_string(),
        });
    }

    for (id, state) in &config.states {
        let path = StatePath::new(id.as_str());
        // History pseudo-states restore within a parent scope; they cannot
        // be top-level.
        if state.state_type.is_history() {
            return Err(invalid(&path, "history state requires a parent state"));
        }
        validate_state(config, &path, id, state)?;
    }

    check_reachability(config)
}

fn invalid(path: &StatePath, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidState { path: path.to_string(), reason: reason.into() }
}

fn validate_state(
    config: &MachineConfig,
    path: &StatePath,
    id: &str,
    state: &StateConfig,
) -> Result<(), ConfigError> {
    if id.trim().is_empty() {
        return Err(invalid(path, "state id is empty"));
    }

    if state.state_type.is_composite() {
        if state.children.is_empty() {
            return Err(invalid(path, format!("{} state requires children", state.state_type)));
        }
        match &state.initial {
            None => {
                return Err(invalid(
                    path,
                    format!("{} state requires an initial child", state.state_type),
                ))
            }
            Some(initial) if !state.children.contains_key(initial.as_str()) => {
                return Err(invalid(path, format!("initial {initial:?} is not a direct child")));
            }
            Some(_) => {}
        }
    } else {
        if !state.children.is_empty() {
            return Err(invalid(path, format!("{} state must not have children", state.state_type)));
        }
        if state.initial.is_some() {
            return Err(invalid(path, format!("{} state must not declare initial", state.state_type)));
        }
    }

    for (event, transitions) in &state.on {
        if event.as_str().trim().is_empty() {
            return Err(invalid(path, "transition event type is empty"));
        }
        let mut seen: HashSet<(&str, u32)> = HashSet::new();
        for t in transitions {
            StatePath::parse(t.target.as_str()).map_err(|source| ConfigError::BadTargetPath {
                path: path.to_string(),
                source,
            })?;
            if config.state_at(&t.target).is_none() {
                return Err(ConfigError::UnknownTarget {
                    path: path.to_string(),
                    event: event.to_string(),
                    target: t.target.to_string(),
                });
            }
            if !seen.insert((t.target.as_str(), t.priority)) {
                return Err(ConfigError::DuplicateTransition {
                    path: path.to_string(),
                    event: event.to_string(),
                    target: t.target.to_string(),
                    priority: t.priority,
                });
            }
        }
    }

    for (child_id, child) in &state.children {
        validate_state(config, &path.join(child_id), child_id, child)?;
    }
    Ok(())
}

/// Sweep from the initial top-level state over child-edges and
/// transition-target roots; any unvisited top-level state is orphaned.
fn check_reachability(config: &MachineConfig) -> Result<(), ConfigError> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![config.initial.as_str()];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        if let Some(state) = config.states.get(id) {
            collect_target_roots(state, &mut stack);
        }
    }

    for id in config.states.keys() {
        if !visited.contains(id.as_str()) {
            return Err(ConfigError::Orphaned { path: id.to_string() });
        }
    }
    Ok(())
}

fn collect_target_roots<'a>(state: &'a StateConfig, out: &mut Vec<&'a str>) {
    for transitions in state.on.values() {
        for t in transitions {
            out.push(t.target.root_id());
        }
    }
    for child in state.children.values() {
        collect_target_roots(child, out);
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
