//! The typed checkpoint handed to downstream consumers.

use serde_json::{Map, Value};

use crate::entry::StateEntry;
use crate::types::{CheckpointHash, StateType};

/// Domain prefix for checkpoint fingerprints.
const FINGERPRINT_DOMAIN: &[u8] = b"syncstate-checkpoint-v0:";

/// A classified checkpoint. Exactly one variant-specific payload exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateWrapper {
    /// Opaque legacy blob.
    Legacy(Value),
    /// The single GLOBAL entry of the batch, payload preserved.
    Global(StateEntry),
    /// Every STREAM entry of the batch, in the order received.
    Stream(Vec<StateEntry>),
}

impl StateWrapper {
    pub fn state_type(&self) -> StateType {
        match self {
            StateWrapper::Legacy(_) => StateType::Legacy,
            StateWrapper::Global(_) => StateType::Global,
            StateWrapper::Stream(_) => StateType::Stream,
        }
    }

    pub fn legacy_state(&self) -> Option<&Value> {
        match self {
            StateWrapper::Legacy(value) => Some(value),
            _ => None,
        }
    }

    pub fn global(&self) -> Option<&StateEntry> {
        match self {
            StateWrapper::Global(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn stream_states(&self) -> Option<&[StateEntry]> {
        match self {
            StateWrapper::Stream(entries) => Some(entries),
            _ => None,
        }
    }

    /// Serialize back to the raw checkpoint shape.
    ///
    /// LEGACY yields the blob itself, GLOBAL a one-element list, STREAM the
    /// list of entries in order. Classifying the output of a GLOBAL or STREAM
    /// wrapper with stream capability reproduces the wrapper.
    pub fn to_state_json(&self) -> Value {
        match self {
            StateWrapper::Legacy(value) => value.clone(),
            StateWrapper::Global(entry) => Value::Array(vec![entry.to_json()]),
            StateWrapper::Stream(entries) => {
                Value::Array(entries.iter().map(StateEntry::to_json).collect())
            }
        }
    }

    /// Compare two checkpoints, treating STREAM entries as an unordered
    /// collection.
    pub fn same_checkpoint(&self, other: &StateWrapper) -> bool {
        match (self, other) {
            (StateWrapper::Stream(a), StateWrapper::Stream(b)) => {
                a.len() == b.len() && sorted_encodings(a) == sorted_encodings(b)
            }
            _ => self == other,
        }
    }

    /// Deterministic fingerprint of the checkpoint.
    ///
    /// Hash = Blake3(domain || type || ":" || canonical JSON), where the
    /// canonical JSON has object keys sorted explicitly at every level (so
    /// enabling `serde_json/preserve_order` does not change it) and STREAM
    /// entries sorted by their encoding. Two wrappers for which [`Self::same_checkpoint`]
    /// holds always share a fingerprint.
    pub fn fingerprint(&self) -> CheckpointHash {
        let canonical = match self {
            StateWrapper::Legacy(value) => canonical_json(value),
            StateWrapper::Global(entry) => canonical_json(&entry.to_json()),
            StateWrapper::Stream(entries) => format!("[{}]", sorted_encodings(entries).join(",")),
        };

        let mut hasher = blake3::Hasher::new();
        hasher.update(FINGERPRINT_DOMAIN);
        hasher.update(self.state_type().as_str().as_bytes());
        hasher.update(b":");
        hasher.update(canonical.as_bytes());
        CheckpointHash(*hasher.finalize().as_bytes())
    }
}

/// Canonical JSON of each entry, sorted.
fn sorted_encodings(entries: &[StateEntry]) -> Vec<String> {
    let mut encoded: Vec<String> = entries.iter().map(|e| canonical_json(&e.to_json())).collect();
    encoded.sort_unstable();
    encoded
}

/// Compact JSON with object keys written in sorted order at every level,
/// whatever ordering the `serde_json` map type uses.
pub(crate) fn canonical_json(value: &Value) -> String {
    sort_keys(value).to_string()
}

/// Rebuild objects inserting keys in sorted order. An insertion-ordered map
/// then serializes exactly like a key-ordered one.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(obj) => {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort_unstable();
            let mut sorted = Map::with_capacity(obj.len());
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&obj[key.as_str()]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
