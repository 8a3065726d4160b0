// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable event values delivered to a statechart runtime

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smol_str::SmolStr;

/// Event type identifier.
///
/// Stored as a small string. Integer identifiers are canonicalised to their
/// decimal form so `on` tables in a configuration use a single key namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventType(SmolStr);

impl EventType {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<u64> for EventType {
    fn from(code: u64) -> Self {
        Self(SmolStr::new(code.to_string()))
    }
}

impl From<i64> for EventType {
    fn from(code: i64) -> Self {
        Self(SmolStr::new(code.to_string()))
    }
}

impl std::borrow::Borrow<str> for EventType {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An external or internal event.
///
/// Constructed once and never mutated; the payload is opaque to the engine
/// and only travels through to guards, actions, and publishers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    event_type: EventType,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    data: Value,
}

impl Event {
    /// Create an event with no payload.
    pub fn new(event_type: impl Into<EventType>) -> Self {
        Self { event_type: event_type.into(), data: Value::Null }
    }

    /// Create an event carrying an opaque payload.
    pub fn with_data(event_type: impl Into<EventType>, data: Value) -> Self {
        Self { event_type: event_type.into(), data }
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Short form used in log lines: the event type plus a payload marker.
    pub fn log_summary(&self) -> String {
        if self.data.is_null() {
            self.event_type.to_string()
        } else {
            format!("{} (+data)", self.event_type)
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.event_type.as_str())
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
