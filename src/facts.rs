// src/facts.rs

//! The fact store: the single source of truth for what has been produced
//! so far in one scheduling pass.
//!
//! Keys are capabilities, values are open-ended JSON payloads. The store
//! grows monotonically across rounds; there is no deletion operation, and
//! once a task has executed successfully its produced keys stay present for
//! the remainder of the run.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::task::Capability;

/// Capability-keyed result store with shallow-union merge semantics.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    entries: BTreeMap<Capability, Value>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the accumulated value for a capability.
    pub fn get(&self, capability: &str) -> Option<&Value> {
        self.entries.get(capability)
    }

    /// Merge a new result under a capability key.
    ///
    /// When the key already exists and both the old and new values are JSON
    /// objects, the new object's fields are folded into the old one per key
    /// (newest producer wins on field collisions). In every other case the
    /// new value replaces the old one wholesale. This lets later producers
    /// augment, not only replace, earlier partial results.
    pub fn merge(&mut self, capability: Capability, value: Value) {
        match (self.entries.get_mut(&capability), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                for (k, v) in incoming {
                    existing.insert(k, v);
                }
            }
            (Some(slot), incoming) => {
                *slot = incoming;
            }
            (None, incoming) => {
                self.entries.insert(capability, incoming);
            }
        }
    }

    /// True iff every listed capability is present.
    pub fn has_all(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|c| self.entries.contains_key(c))
    }

    /// Capability keys currently present, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the whole store as a single JSON object, used both to
    /// hand the state to external task processes and for final output.
    pub fn as_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}
