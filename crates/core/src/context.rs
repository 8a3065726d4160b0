// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared key-value context observed and mutated by actions

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Serialisable snapshot of a context's contents.
pub type ContextMap = HashMap<String, Value>;

/// Concurrency-safe map from string keys to opaque values.
///
/// Handles are cheap to clone and share one underlying map. Reads take a
/// shared lock; the engine never inspects stored values.
#[derive(Debug, Clone, Default)]
pub struct Context {
    inner: Arc<RwLock<ContextMap>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a context from an existing map.
    pub fn from_map(map: ContextMap) -> Self {
        Self { inner: Arc::new(RwLock::new(map)) }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.read().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.inner.write().insert(key.into(), value);
    }

    /// Remove a key, returning the previous value if present.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.write().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Shallow copy of the current contents.
    pub fn snapshot(&self) -> ContextMap {
        self.inner.read().clone()
    }

    /// Replace the contents wholesale.
    pub fn restore(&self, map: ContextMap) {
        *self.inner.write() = map;
    }

    /// Read-modify-write a single key under one write lock.
    pub fn update(&self, key: &str, f: impl FnOnce(Option<&Value>) -> Value) {
        let mut guard = self.inner.write();
        let next = f(guard.get(key));
        guard.insert(key.to_string(), next);
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
