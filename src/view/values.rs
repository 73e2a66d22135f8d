//! Event value merging.
//!
//! A node binds a primary value (`phx-value`) and any number of named values
//! (`phx-value-<name>`). The payload sent with an event is the primary value
//! alone when nothing else is set, or a map with the primary value under
//! [`PRIMARY_VALUE_KEY`]. Writes are last-write-wins per name.
//!
//! [`PhxValues`] is persistent: every setter returns a new value, and the
//! payload is derived on demand rather than stored.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Map key the primary value is stored under.
pub const PRIMARY_VALUE_KEY: &str = "value";

/// Bound event values for one node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhxValues {
    entries: BTreeMap<String, Value>,
}

impl PhxValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy with the primary value set.
    pub fn with_primary(&self, value: impl Into<Value>) -> Self {
        self.with_named(PRIMARY_VALUE_KEY, value)
    }

    /// A copy with `name` set, replacing any earlier value.
    pub fn with_named(&self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(name.into(), value.into());
        Self { entries }
    }

    /// Union of both sets; `other` wins on conflicts.
    pub fn merged(&self, other: &PhxValues) -> Self {
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { entries }
    }

    pub fn primary(&self) -> Option<&Value> {
        self.entries.get(PRIMARY_VALUE_KEY)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The event payload: `Null` when empty, the bare primary value when it
    /// is the only entry, otherwise an object of every entry.
    pub fn payload(&self) -> Value {
        match self.entries.len() {
            0 => Value::Null,
            1 if self.primary().is_some() => self.primary().cloned().unwrap_or(Value::Null),
            _ => Value::Object(
                self.entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    /// Payload with an interaction value (e.g. a checkbox's new state)
    /// merged in as the primary value.
    pub fn payload_with(&self, value: Option<Value>) -> Value {
        match value {
            Some(v) => self.with_primary(v).payload(),
            None => self.payload(),
        }
    }
}
