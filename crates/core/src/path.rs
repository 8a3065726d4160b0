// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dot-separated state paths and the algebra the interpreter runs on.
//!
//! A path names a state by the ids of its ancestors, root first:
//! `player.alive.idle`. Paths replace parent back-pointers — all upward
//! navigation is prefix arithmetic over segments.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Errors from [`StatePath::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("state path is empty")]
    Empty,
    #[error("state path {path:?} has an empty segment")]
    EmptySegment { path: String },
    #[error("state path segment {segment:?} contains invalid characters")]
    InvalidSegment { segment: String },
}

/// Full dot-path of a state within a machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatePath(SmolStr);

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl StatePath {
    /// Construct without syntax checking. Engine-internal joins use this;
    /// externally supplied paths go through [`StatePath::parse`].
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(SmolStr::new(path.as_ref()))
    }

    /// Parse and validate a path: non-empty, segments of `[A-Za-z0-9_-]+`.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        for segment in path.split(PATH_SEPARATOR) {
            if segment.is_empty() {
                return Err(PathError::EmptySegment { path: path.to_string() });
            }
            if !valid_segment(segment) {
                return Err(PathError::InvalidSegment { segment: segment.to_string() });
            }
        }
        Ok(Self(SmolStr::new(path)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(PATH_SEPARATOR)
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// First segment: the top-level state id.
    pub fn root_id(&self) -> &str {
        self.0.split(PATH_SEPARATOR).next().unwrap_or("")
    }

    /// Last segment: the id of the state itself.
    pub fn leaf_id(&self) -> &str {
        self.0.rsplit(PATH_SEPARATOR).next().unwrap_or("")
    }

    /// Path of the parent state, or `None` for a top-level state.
    pub fn parent(&self) -> Option<StatePath> {
        self.0.rfind(PATH_SEPARATOR).map(|idx| Self(SmolStr::new(&self.0[..idx])))
    }

    /// Append a child segment.
    pub fn join(&self, child: &str) -> StatePath {
        Self(SmolStr::new(format!("{}{}{}", self.0, PATH_SEPARATOR, child)))
    }

    /// Whether `self` is an ancestor of `other` (strict: not equal).
    pub fn is_ancestor_of(&self, other: &StatePath) -> bool {
        other.0.len() > self.0.len()
            && other.0.starts_with(self.0.as_str())
            && other.0.as_bytes()[self.0.len()] == PATH_SEPARATOR as u8
    }

    /// Whether `self` equals `other` or is an ancestor of it.
    pub fn contains(&self, other: &StatePath) -> bool {
        self == other || self.is_ancestor_of(other)
    }

    /// All prefixes of the path, root first, ending with the path itself.
    pub fn ancestors(&self) -> Vec<StatePath> {
        let mut out = Vec::with_capacity(self.depth());
        let s = self.0.as_str();
        for (idx, ch) in s.char_indices() {
            if ch == PATH_SEPARATOR {
                out.push(Self(SmolStr::new(&s[..idx])));
            }
        }
        out.push(self.clone());
        out
    }

    /// Least common compound ancestor of two paths: the deepest path that is
    /// a prefix (by whole segments) of both. `None` when the root segments
    /// differ — the transition crosses the implicit machine root.
    pub fn lcca(&self, other: &StatePath) -> Option<StatePath> {
        let mut prefix_len = 0usize;
        let mut matched = false;
        for (a, b) in self.segments().zip(other.segments()) {
            if a != b {
                break;
            }
            prefix_len = if matched { prefix_len + 1 + a.len() } else { a.len() };
            matched = true;
        }
        matched.then(|| Self(SmolStr::new(&self.0[..prefix_len])))
    }
}

impl From<&str> for StatePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl std::borrow::Borrow<str> for StatePath {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for StatePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Paths exited when moving from `src` up to (exclusive) `lcca`, in
/// outer-to-inner order. The interpreter iterates in reverse so inner states
/// exit before outer ones. `lcca == None` exits the whole chain from the
/// top-level state down to `src`.
pub fn exit_paths(src: &StatePath, lcca: Option<&StatePath>) -> Vec<StatePath> {
    below(src, lcca)
}

/// Paths entered when descending from `lcca` (exclusive) down to `tgt`, in
/// outer-to-inner order, which is also execution order.
pub fn entry_paths(lcca: Option<&StatePath>, tgt: &StatePath) -> Vec<StatePath> {
    below(tgt, lcca)
}

/// Ancestors of `endpoint` strictly deeper than `boundary`, outer-to-inner.
fn below(endpoint: &StatePath, boundary: Option<&StatePath>) -> Vec<StatePath> {
    let skip = boundary.map(StatePath::depth).unwrap_or(0);
    let mut chain = endpoint.ancestors();
    chain.drain(..skip.min(chain.len()));
    chain
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
