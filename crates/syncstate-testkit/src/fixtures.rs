//! Test fixtures and helpers.
//!
//! Builders for the entries and raw batches that tests feed to the
//! classifier.

use serde_json::{json, Value};

use syncstate_core::{GlobalPayload, StateEntry, StreamDescriptor, StreamPayload};

/// A STREAM entry for `name` with an empty stream state.
pub fn stream_entry(name: &str) -> StateEntry {
    StateEntry::stream(stream_payload(name))
}

/// A STREAM entry inside `namespace` with the given state.
pub fn namespaced_stream_entry(namespace: &str, name: &str, state: Value) -> StateEntry {
    StateEntry::stream(StreamPayload::new(
        StreamDescriptor::namespaced(namespace, name),
        state,
    ))
}

/// A stream payload for `name` with an empty stream state.
pub fn stream_payload(name: &str) -> StreamPayload {
    StreamPayload::new(StreamDescriptor::new(name), json!({}))
}

/// A GLOBAL entry with an empty shared state and one empty sub-state per
/// stream name.
pub fn global_entry(streams: &[&str]) -> StateEntry {
    StateEntry::global(GlobalPayload::new(
        json!({}),
        streams.iter().map(|name| stream_payload(name)).collect(),
    ))
}

/// A LEGACY entry carrying `data`.
pub fn legacy_entry(data: Value) -> StateEntry {
    StateEntry::legacy().with_data(data)
}

/// Encode entries as a raw checkpoint list.
pub fn batch(entries: &[StateEntry]) -> Value {
    Value::Array(entries.iter().map(StateEntry::to_json).collect())
}

/// Accumulates entries into a raw batch, including elements that do not
/// follow the entry schema.
#[derive(Debug, Clone, Default)]
pub struct BatchBuilder {
    items: Vec<Value>,
}

impl BatchBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a well-formed entry.
    pub fn entry(mut self, entry: StateEntry) -> Self {
        self.items.push(entry.to_json());
        self
    }

    /// Append a STREAM entry for each name.
    pub fn streams(mut self, names: &[&str]) -> Self {
        self.items
            .extend(names.iter().map(|name| stream_entry(name).to_json()));
        self
    }

    /// Append an arbitrary raw element.
    pub fn raw(mut self, item: Value) -> Self {
        self.items.push(item);
        self
    }

    /// Number of elements so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no element was added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The raw checkpoint list.
    pub fn build(self) -> Value {
        Value::Array(self.items)
    }
}
