// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transition selection and planning.
//!
//! Everything here is read-only over the compiled machine and the active
//! leaf set: candidate search walks ancestor chains under the machine read
//! lock, and the resulting [`TransitionPlan`] is applied separately under
//! the write lock. One event yields at most one plan (a microstep).

use crate::actions::{ActionRef, GuardEvaluator};
use crate::compile::CompiledMachine;
use crate::config::{StateType, TransitionConfig};
use crate::history::HistoryTracker;
use std::collections::HashSet;
use sy_core::path::{entry_paths, exit_paths};
use sy_core::{Context, Event, StatePath};

/// A guard-passing transition found during candidate search.
#[derive(Debug)]
pub struct Candidate<'a> {
    /// The state whose `on` table declared the transition. An ancestor of
    /// (or equal to) some active leaf.
    pub source: &'a StatePath,
    pub transition: &'a TransitionConfig,
    /// Declaration index within the source's transition list.
    pub index: usize,
}

/// Collect guard-passing candidates for an event.
///
/// For each active leaf the ancestor chain is walked innermost first; the
/// walk stops at the first ancestor that yields any enabled transition, so
/// an inner state shadows its ancestors for that leaf. Guards must be
/// side-effect-free; a transition without a guard is always enabled.
pub fn find_candidates<'a>(
    compiled: &'a CompiledMachine,
    current: &[StatePath],
    event: &Event,
    guards: &dyn GuardEvaluator,
    context: &Context,
) -> Vec<Candidate<'a>> {
    let mut out: Vec<Candidate<'a>> = Vec::new();
    let mut seen: HashSet<(&StatePath, usize)> = HashSet::new();
    for leaf in current {
        for ancestor in compiled.ancestor_chain(leaf) {
            let Some(state) = compiled.state(ancestor) else { continue };
            let Some(transitions) = state.transitions_for(event.event_type()) else {
                continue;
            };
            let mut found = false;
            for (index, t) in transitions.iter().enumerate() {
                let enabled =
                    t.guard.as_ref().map_or(true, |g| guards.evaluate(g, context, event));
                if enabled {
                    found = true;
                    if seen.insert((ancestor, index)) {
                        out.push(Candidate { source: ancestor, transition: t, index });
                    }
                }
            }
            if found {
                break;
            }
        }
    }
    out
}

/// Pick the winning candidate: highest priority, then deepest source, then
/// declaration order. Ties beyond that keep active-leaf iteration order
/// (the sort is stable).
pub fn select_candidate(mut candidates: Vec<Candidate<'_>>) -> Option<Candidate<'_>> {
    candidates.sort_by(|a, b| {
        b.transition
            .priority
            .cmp(&a.transition.priority)
            .then_with(|| b.source.depth().cmp(&a.source.depth()))
            .then_with(|| a.index.cmp(&b.index))
    });
    candidates.into_iter().next()
}

/// Fully-resolved effect of one transition, ready to commit.
#[derive(Debug)]
pub struct TransitionPlan {
    pub source: StatePath,
    pub target: StatePath,
    pub lcca: Option<StatePath>,
    /// Every active state leaving the configuration, outer-to-inner.
    /// Executed in reverse so inner states exit first.
    pub exited: Vec<StatePath>,
    /// Every state entering the configuration, outer-to-inner; execution
    /// order.
    pub entered: Vec<StatePath>,
    /// Active leaves after the commit, one per entered region.
    pub target_leaves: Vec<StatePath>,
    /// Subtree whose previous leaves are replaced by `target_leaves`.
    pub removal_scope: StatePath,
    /// Transition actions, run between exits and entries.
    pub actions: Vec<ActionRef>,
}

/// Compute the exit/entry sets for a selected candidate.
///
/// History restoration happens here (read-only): a history target resolves
/// in its parent's scope before the LCCA is computed.
pub fn build_plan(
    compiled: &CompiledMachine,
    current: &[StatePath],
    candidate: &Candidate<'_>,
    history: &HistoryTracker,
) -> TransitionPlan {
    let src = candidate.source.clone();
    let target = candidate.transition.target.clone();
    let resolution = compiled.resolve_initial(&target, history);
    let anchor = resolution.anchor.clone();

    // A parallel state cannot host a divergence: a transition between two
    // of its regions leaves and re-enters the whole parallel.
    let mut lcca = src.lcca(&anchor);
    if let Some(l) = &lcca {
        let is_parallel =
            compiled.state(l).is_some_and(|s| s.state_type == StateType::Parallel);
        if is_parallel && *l != src && *l != anchor {
            lcca = l.parent();
        }
    }

    let exit_chain = exit_paths(&src, lcca.as_ref());
    let exited = match exit_chain.first() {
        Some(root) => active_under(root, current),
        None => Vec::new(),
    };

    let entry_chain = entry_paths(lcca.as_ref(), &anchor);
    let removal_scope = match (exit_chain.first(), &lcca) {
        (Some(root), _) => root.clone(),
        (None, Some(l)) => {
            let parallel =
                compiled.state(l).is_some_and(|s| s.state_type == StateType::Parallel);
            if parallel {
                entry_chain.first().cloned().unwrap_or_else(|| l.clone())
            } else {
                l.clone()
            }
        }
        (None, None) => StatePath::new(anchor.root_id()),
    };

    let mut entered = entry_chain;
    entered.extend(resolution.entered);
    let mut target_leaves = resolution.leaves;
    complete_parallel_regions(compiled, history, &anchor, &mut entered, &mut target_leaves);

    TransitionPlan {
        source: src,
        target,
        lcca,
        exited,
        entered,
        target_leaves,
        removal_scope,
        actions: candidate.transition.actions.clone(),
    }
}

/// Active states at or below `root`, outer-to-inner. Deduplicated; ties in
/// depth keep leaf-iteration order.
pub fn active_under(root: &StatePath, current: &[StatePath]) -> Vec<StatePath> {
    let mut out: Vec<StatePath> = Vec::new();
    for leaf in current {
        if !root.contains(leaf) {
            continue;
        }
        for p in leaf.ancestors() {
            if root.contains(&p) && !out.contains(&p) {
                out.push(p);
            }
        }
    }
    out.sort_by_key(StatePath::depth);
    out
}

/// Default-enter the regions of any entered parallel state that the anchor
/// descent did not reach. The anchor's branch enters first, then remaining
/// regions in declaration order.
fn complete_parallel_regions(
    compiled: &CompiledMachine,
    history: &HistoryTracker,
    anchor: &StatePath,
    entered: &mut Vec<StatePath>,
    leaves: &mut Vec<StatePath>,
) {
    let mut i = 0;
    while i < entered.len() {
        let path = entered[i].clone();
        i += 1;
        let Some(state) = compiled.state(&path) else { continue };
        if state.state_type != StateType::Parallel {
            continue;
        }
        for id in state.children.clone() {
            let region = path.join(&id);
            if compiled.state(&region).is_some_and(|s| s.state_type.is_history()) {
                continue;
            }
            let covered = region == *anchor || entered.contains(&region);
            if covered {
                continue;
            }
            let resolution = compiled.resolve_initial(&region, history);
            entered.push(region);
            entered.extend(resolution.entered);
            leaves.extend(resolution.leaves);
        }
    }
}

#[cfg(test)]
#[path = "interpreter_tests.rs"]
mod tests;
