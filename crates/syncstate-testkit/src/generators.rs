//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{Map, Value};

use syncstate_core::{
    GlobalPayload, StateEntry, StateType, StreamDescriptor, StreamPayload,
};

/// Generate a stream name.
pub fn stream_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}".prop_map(String::from)
}

/// Generate a descriptor, with or without a namespace.
pub fn stream_descriptor() -> impl Strategy<Value = StreamDescriptor> {
    (stream_name(), proptest::option::of(stream_name())).prop_map(|(name, namespace)| {
        StreamDescriptor { name, namespace }
    })
}

/// Generate a JSON scalar.
pub fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,16}".prop_map(Value::String),
    ]
}

/// Generate a nested JSON value of bounded depth.
pub fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Generate a JSON object (a typical opaque legacy checkpoint).
pub fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,6}", json_value(), 0..4)
        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
}

/// Generate a per-stream payload.
pub fn stream_payload() -> impl Strategy<Value = StreamPayload> {
    (stream_descriptor(), json_object()).prop_map(|(d, state)| StreamPayload::new(d, state))
}

/// Generate a global payload.
pub fn global_payload() -> impl Strategy<Value = GlobalPayload> {
    (json_object(), prop::collection::vec(stream_payload(), 0..4))
        .prop_map(|(shared, streams)| GlobalPayload::new(shared, streams))
}

/// Generate optional non-null legacy data.
pub fn legacy_data() -> impl Strategy<Value = Option<Value>> {
    proptest::option::of(json_value().prop_filter("null data counts as absent", |v| !v.is_null()))
}

/// Generate an entry of the given type.
pub fn entry_of(state_type: StateType) -> BoxedStrategy<StateEntry> {
    let payload = match state_type {
        StateType::Legacy => Just(StateEntry::legacy()).boxed(),
        StateType::Global => global_payload().prop_map(StateEntry::global).boxed(),
        StateType::Stream => stream_payload().prop_map(StateEntry::stream).boxed(),
    };
    (payload, legacy_data())
        .prop_map(|(mut entry, data)| {
            entry.data = data;
            entry
        })
        .boxed()
}

/// Generate a state type.
pub fn state_type() -> impl Strategy<Value = StateType> {
    prop_oneof![
        Just(StateType::Legacy),
        Just(StateType::Global),
        Just(StateType::Stream),
    ]
}

/// A non-empty batch whose entries all share one type.
#[derive(Debug, Clone)]
pub struct TypedBatch {
    pub state_type: StateType,
    pub entries: Vec<StateEntry>,
}

impl TypedBatch {
    /// The raw checkpoint list for this batch.
    pub fn to_json(&self) -> Value {
        crate::fixtures::batch(&self.entries)
    }
}

impl Arbitrary for TypedBatch {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        state_type()
            .prop_flat_map(|ty| {
                // GLOBAL batches are only valid with a single entry.
                let max = if ty == StateType::Global { 2 } else { 6 };
                prop::collection::vec(entry_of(ty), 1..max).prop_map(move |entries| TypedBatch {
                    state_type: ty,
                    entries,
                })
            })
            .boxed()
    }
}
