// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for paths and events.
pub mod strategies {
    use crate::{Event, EventType, StatePath};
    use proptest::prelude::*;

    /// A single valid path segment.
    pub fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9_-]{0,7}"
    }

    /// A valid dot-path of 1–4 segments.
    pub fn state_path() -> impl Strategy<Value = StatePath> {
        prop::collection::vec(segment(), 1..=4)
            .prop_map(|segs| StatePath::new(segs.join(".")))
    }

    /// An event with a small alphanumeric type and no payload.
    pub fn event() -> impl Strategy<Value = Event> {
        "[a-z][a-z0-9]{0,7}".prop_map(|t| Event::new(EventType::new(t)))
    }
}
