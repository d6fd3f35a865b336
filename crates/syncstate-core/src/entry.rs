//! State entries: one element of a new-format checkpoint batch.
//!
//! Decoding reads the `type` discriminator first and then dispatches to the
//! payload for that variant. Keys that belong to other variants are never
//! inspected, so a STREAM entry carrying a stray `global` key still decodes.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::EntryDecodeError;
use crate::types::{StateType, StreamDescriptor};

/// Wire key of the discriminator.
pub const TYPE_KEY: &str = "type";
/// Wire key of the legacy-compatibility payload.
pub const DATA_KEY: &str = "data";
/// Wire key of the GLOBAL payload.
pub const GLOBAL_KEY: &str = "global";
/// Wire key of the STREAM payload.
pub const STREAM_KEY: &str = "stream";

/// Checkpoint of a single stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPayload {
    pub stream_descriptor: StreamDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_state: Option<Value>,
}

impl StreamPayload {
    /// Create a stream payload.
    pub fn new(stream_descriptor: StreamDescriptor, stream_state: impl Into<Value>) -> Self {
        Self {
            stream_descriptor,
            stream_state: Some(stream_state.into()),
        }
    }

    /// Wire JSON for this payload.
    pub fn to_json(&self) -> Value {
        let mut descriptor = Map::new();
        descriptor.insert(
            "name".into(),
            Value::String(self.stream_descriptor.name.clone()),
        );
        if let Some(ns) = &self.stream_descriptor.namespace {
            descriptor.insert("namespace".into(), Value::String(ns.clone()));
        }

        let mut obj = Map::new();
        obj.insert("stream_descriptor".into(), Value::Object(descriptor));
        if let Some(state) = &self.stream_state {
            obj.insert("stream_state".into(), state.clone());
        }
        Value::Object(obj)
    }
}

/// Checkpoint shared across all streams of a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_state: Option<Value>,
    #[serde(default)]
    pub stream_states: Vec<StreamPayload>,
}

impl GlobalPayload {
    /// Create a global payload.
    pub fn new(shared_state: impl Into<Value>, stream_states: Vec<StreamPayload>) -> Self {
        Self {
            shared_state: Some(shared_state.into()),
            stream_states,
        }
    }

    /// Wire JSON for this payload.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        if let Some(shared) = &self.shared_state {
            obj.insert("shared_state".into(), shared.clone());
        }
        obj.insert(
            "stream_states".into(),
            Value::Array(self.stream_states.iter().map(StreamPayload::to_json).collect()),
        );
        Value::Object(obj)
    }
}

/// The variant-specific part of an entry, selected by its `type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPayload {
    Legacy,
    Global(GlobalPayload),
    Stream(StreamPayload),
}

impl EntryPayload {
    /// The discriminator this payload is written under.
    pub fn state_type(&self) -> StateType {
        match self {
            EntryPayload::Legacy => StateType::Legacy,
            EntryPayload::Global(_) => StateType::Global,
            EntryPayload::Stream(_) => StateType::Stream,
        }
    }
}

/// One element of a typed checkpoint batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    /// Variant payload.
    pub payload: EntryPayload,
    /// Legacy shadow of the same checkpoint. Only authoritative when the
    /// consumer cannot handle GLOBAL or STREAM checkpoints.
    pub data: Option<Value>,
}

impl StateEntry {
    /// A LEGACY entry without data.
    pub fn legacy() -> Self {
        Self {
            payload: EntryPayload::Legacy,
            data: None,
        }
    }

    /// A GLOBAL entry.
    pub fn global(global: GlobalPayload) -> Self {
        Self {
            payload: EntryPayload::Global(global),
            data: None,
        }
    }

    /// A STREAM entry.
    pub fn stream(stream: StreamPayload) -> Self {
        Self {
            payload: EntryPayload::Stream(stream),
            data: None,
        }
    }

    /// Attach a legacy-compatibility payload.
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// The entry's discriminator.
    pub fn state_type(&self) -> StateType {
        self.payload.state_type()
    }

    /// The legacy-compatibility payload, if any.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// The GLOBAL payload, if this is a GLOBAL entry.
    pub fn global_payload(&self) -> Option<&GlobalPayload> {
        match &self.payload {
            EntryPayload::Global(g) => Some(g),
            _ => None,
        }
    }

    /// The STREAM payload, if this is a STREAM entry.
    pub fn stream_payload(&self) -> Option<&StreamPayload> {
        match &self.payload {
            EntryPayload::Stream(s) => Some(s),
            _ => None,
        }
    }

    /// Decode one raw element.
    ///
    /// A missing or `null` discriminator yields [`EntryDecodeError::Untyped`].
    /// Anything else that cannot be read as an entry (not an object, unknown
    /// discriminator, missing or invalid payload for the declared type) is
    /// [`EntryDecodeError::Malformed`]. A `null` `data` field counts as absent.
    pub fn decode(raw: &Value) -> Result<Self, EntryDecodeError> {
        let state_type = read_type(raw)?;
        let obj = raw.as_object().ok_or_else(|| not_an_object(raw))?;

        let payload = match state_type {
            StateType::Legacy => EntryPayload::Legacy,
            StateType::Global => EntryPayload::Global(decode_payload(obj, GLOBAL_KEY)?),
            StateType::Stream => EntryPayload::Stream(decode_payload(obj, STREAM_KEY)?),
        };

        Ok(Self {
            payload,
            data: read_data(raw).cloned(),
        })
    }

    /// Wire JSON for this entry. Keys of other variants are never written.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(
            TYPE_KEY.into(),
            Value::String(self.state_type().as_str().to_string()),
        );
        match &self.payload {
            EntryPayload::Legacy => {}
            EntryPayload::Global(g) => {
                obj.insert(GLOBAL_KEY.into(), g.to_json());
            }
            EntryPayload::Stream(s) => {
                obj.insert(STREAM_KEY.into(), s.to_json());
            }
        }
        if let Some(data) = &self.data {
            obj.insert(DATA_KEY.into(), data.clone());
        }
        Value::Object(obj)
    }
}

impl Serialize for StateEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StateEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        StateEntry::decode(&raw).map_err(D::Error::custom)
    }
}

/// Read only the discriminator of a raw element, leaving the payload
/// undecoded.
pub fn read_type(raw: &Value) -> Result<StateType, EntryDecodeError> {
    let obj = raw.as_object().ok_or_else(|| not_an_object(raw))?;

    match obj.get(TYPE_KEY) {
        None | Some(Value::Null) => Err(EntryDecodeError::Untyped),
        Some(Value::String(s)) => StateType::from_wire(s).ok_or_else(|| {
            EntryDecodeError::Malformed(format!("unknown state type {:?}", s))
        }),
        Some(other) => Err(EntryDecodeError::Malformed(format!(
            "type must be a string, got {}",
            json_kind(other)
        ))),
    }
}

/// The non-null `data` field of a raw element, if any.
pub fn read_data(raw: &Value) -> Option<&Value> {
    raw.get(DATA_KEY).filter(|v| !v.is_null())
}

fn not_an_object(raw: &Value) -> EntryDecodeError {
    EntryDecodeError::Malformed(format!("expected object, got {}", json_kind(raw)))
}

fn decode_payload<T: DeserializeOwned>(
    obj: &Map<String, Value>,
    key: &str,
) -> Result<T, EntryDecodeError> {
    let value = obj
        .get(key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| EntryDecodeError::Malformed(format!("missing `{}` payload", key)))?;
    T::deserialize(value)
        .map_err(|e| EntryDecodeError::Malformed(format!("invalid `{}` payload: {}", key, e)))
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stream_a() -> StreamPayload {
        StreamPayload::new(StreamDescriptor::new("a"), json!({}))
    }

    #[test]
    fn test_decode_stream_entry() {
        let raw = json!({
            "type": "STREAM",
            "stream": {
                "stream_descriptor": { "name": "a", "namespace": "public" },
                "stream_state": { "cursor": 10 }
            }
        });

        let entry = StateEntry::decode(&raw).unwrap();
        assert_eq!(entry.state_type(), StateType::Stream);
        let stream = entry.stream_payload().unwrap();
        assert_eq!(
            stream.stream_descriptor,
            StreamDescriptor::namespaced("public", "a")
        );
        assert_eq!(stream.stream_state, Some(json!({ "cursor": 10 })));
        assert!(entry.data().is_none());
    }

    #[test]
    fn test_decode_global_entry() {
        let raw = json!({
            "type": "GLOBAL",
            "global": {
                "shared_state": { "lsn": 7 },
                "stream_states": [
                    { "stream_descriptor": { "name": "a" }, "stream_state": {} }
                ]
            },
            "data": 1
        });

        let entry = StateEntry::decode(&raw).unwrap();
        let global = entry.global_payload().unwrap();
        assert_eq!(global.shared_state, Some(json!({ "lsn": 7 })));
        assert_eq!(global.stream_states, vec![stream_a()]);
        assert_eq!(entry.data(), Some(&json!(1)));
    }

    #[test]
    fn test_decode_legacy_entry_keeps_data() {
        let entry = StateEntry::decode(&json!({ "type": "LEGACY", "data": {} })).unwrap();
        assert_eq!(entry, StateEntry::legacy().with_data(json!({})));
    }

    #[test]
    fn test_decode_ignores_other_variant_keys() {
        let raw = json!({
            "type": "STREAM",
            "stream": { "stream_descriptor": { "name": "a" }, "stream_state": {} },
            "global": "not a global payload"
        });

        let entry = StateEntry::decode(&raw).unwrap();
        assert_eq!(entry, StateEntry::stream(stream_a()));
    }

    #[test]
    fn test_decode_untyped() {
        assert_eq!(
            StateEntry::decode(&json!({ "Any": "value" })),
            Err(EntryDecodeError::Untyped)
        );
        assert_eq!(
            StateEntry::decode(&json!({ "type": null, "data": 1 })),
            Err(EntryDecodeError::Untyped)
        );
    }

    #[test]
    fn test_decode_malformed() {
        let cases = [
            json!(5),
            json!("STREAM"),
            json!({ "type": "PARTIAL" }),
            json!({ "type": 3 }),
            json!({ "type": "GLOBAL" }),
            json!({ "type": "STREAM", "stream": null }),
            json!({ "type": "STREAM", "stream": { "stream_state": {} } }),
        ];

        for raw in cases {
            assert!(
                matches!(StateEntry::decode(&raw), Err(EntryDecodeError::Malformed(_))),
                "expected malformed for {}",
                raw
            );
        }
    }

    #[test]
    fn test_read_type_ignores_payload() {
        assert_eq!(
            read_type(&json!({ "type": "GLOBAL", "data": 1 })),
            Ok(StateType::Global)
        );
        assert_eq!(
            read_type(&json!({ "type": "STREAM", "stream": "garbage" })),
            Ok(StateType::Stream)
        );
        assert_eq!(read_type(&json!({ "data": 1 })), Err(EntryDecodeError::Untyped));
        assert!(matches!(read_type(&json!([1])), Err(EntryDecodeError::Malformed(_))));
        assert!(matches!(
            read_type(&json!({ "type": "PARTIAL" })),
            Err(EntryDecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_read_data() {
        assert_eq!(read_data(&json!({ "type": "GLOBAL", "data": 1 })), Some(&json!(1)));
        assert_eq!(read_data(&json!({ "type": "GLOBAL", "data": null })), None);
        assert_eq!(read_data(&json!(3)), None);
    }

    #[test]
    fn test_null_data_is_absent() {
        let entry = StateEntry::decode(&json!({ "type": "LEGACY", "data": null })).unwrap();
        assert!(entry.data().is_none());
    }

    #[test]
    fn test_to_json_matches_wire_layout() {
        let entry = StateEntry::global(GlobalPayload::new(json!({}), vec![stream_a()]))
            .with_data(json!(1));

        assert_eq!(
            entry.to_json(),
            json!({
                "type": "GLOBAL",
                "global": {
                    "shared_state": {},
                    "stream_states": [
                        { "stream_descriptor": { "name": "a" }, "stream_state": {} }
                    ]
                },
                "data": 1
            })
        );
    }

    #[test]
    fn test_payload_to_json_agrees_with_serde() {
        let stream = StreamPayload::new(StreamDescriptor::namespaced("ns", "b"), json!([1, 2]));
        assert_eq!(stream.to_json(), serde_json::to_value(&stream).unwrap());

        let global = GlobalPayload {
            shared_state: None,
            stream_states: vec![stream],
        };
        assert_eq!(global.to_json(), serde_json::to_value(&global).unwrap());
    }

    #[test]
    fn test_serde_goes_through_codec() {
        let entry: StateEntry = serde_json::from_value(json!({
            "type": "STREAM",
            "stream": { "stream_descriptor": { "name": "a" }, "stream_state": {} }
        }))
        .unwrap();
        assert_eq!(entry, StateEntry::stream(stream_a()));

        let err = serde_json::from_value::<StateEntry>(json!({ "data": 1 })).unwrap_err();
        assert!(err.to_string().contains("no type discriminator"));
    }
}
