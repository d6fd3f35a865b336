//! Golden classification scenarios.
//!
//! Each vector pairs a raw checkpoint and a capability flag with the exact
//! outcome every implementation of the classifier must produce.

use serde_json::{json, Value};

use syncstate_core::{classify, StateError, StateType, StateWrapper};

use crate::fixtures::{batch, global_entry, legacy_entry, stream_entry, BatchBuilder};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Raw checkpoint, `None` when absent.
    pub input: Option<Value>,
    /// Whether the consumer understands GLOBAL and STREAM checkpoints.
    pub stream_capable: bool,
    /// Expected classification result.
    pub expected: Result<Option<StateWrapper>, StateError>,
}

impl GoldenVector {
    /// Run the classifier on this vector's input.
    pub fn run(&self) -> Result<Option<StateWrapper>, StateError> {
        classify(self.input.as_ref(), self.stream_capable)
    }

    /// Whether `actual` matches the expectation. STREAM results are compared
    /// as unordered collections.
    pub fn matches(&self, actual: &Result<Option<StateWrapper>, StateError>) -> bool {
        match (&self.expected, actual) {
            (Ok(Some(expected)), Ok(Some(actual))) => expected.same_checkpoint(actual),
            (expected, actual) => expected == actual,
        }
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    let global = global_entry(&["a", "b"]);

    vec![
        GoldenVector {
            name: "absent state",
            input: None,
            stream_capable: true,
            expected: Ok(None),
        },
        GoldenVector {
            name: "null state without capability",
            input: Some(Value::Null),
            stream_capable: false,
            expected: Ok(None),
        },
        GoldenVector {
            name: "empty list",
            input: Some(json!([])),
            stream_capable: true,
            expected: Ok(None),
        },
        GoldenVector {
            name: "empty object is legacy",
            input: Some(json!({})),
            stream_capable: true,
            expected: Ok(Some(StateWrapper::Legacy(json!({})))),
        },
        GoldenVector {
            name: "object is legacy without capability",
            input: Some(json!({ "cursor": "2022-06-01" })),
            stream_capable: false,
            expected: Ok(Some(StateWrapper::Legacy(json!({ "cursor": "2022-06-01" })))),
        },
        GoldenVector {
            name: "untyped list is legacy",
            input: Some(json!([{ "Any": "value" }])),
            stream_capable: true,
            expected: Ok(Some(StateWrapper::Legacy(json!([{ "Any": "value" }])))),
        },
        GoldenVector {
            name: "legacy entry in new format",
            input: Some(batch(&[legacy_entry(json!({}))])),
            stream_capable: true,
            expected: Ok(Some(StateWrapper::Legacy(json!({})))),
        },
        GoldenVector {
            name: "global",
            input: Some(batch(&[global.clone()])),
            stream_capable: true,
            expected: Ok(Some(StateWrapper::Global(global.clone()))),
        },
        GoldenVector {
            name: "global forced to legacy",
            input: Some(batch(&[global.clone().with_data(json!(1))])),
            stream_capable: false,
            expected: Ok(Some(StateWrapper::Legacy(json!(1)))),
        },
        GoldenVector {
            name: "stream",
            input: Some(BatchBuilder::new().streams(&["a", "b"]).build()),
            stream_capable: true,
            expected: Ok(Some(StateWrapper::Stream(vec![
                stream_entry("b"),
                stream_entry("a"),
            ]))),
        },
        GoldenVector {
            name: "stream forced to legacy, last entry wins",
            input: Some(batch(&[
                stream_entry("a").with_data(json!(1)),
                stream_entry("b").with_data(json!(2)),
            ])),
            stream_capable: false,
            expected: Ok(Some(StateWrapper::Legacy(json!(2)))),
        },
        GoldenVector {
            name: "mixed stream and global",
            input: Some(batch(&[stream_entry("a"), global.clone()])),
            stream_capable: true,
            expected: Err(StateError::MixedTypeBatch {
                index: 1,
                expected: StateType::Stream,
                found: Some(StateType::Global),
            }),
        },
        GoldenVector {
            name: "duplicated global",
            input: Some(batch(&[global.clone(), global.clone()])),
            stream_capable: true,
            expected: Err(StateError::DuplicatedGlobalState { count: 2 }),
        },
        GoldenVector {
            name: "payload-less global in stream batch is mixed",
            input: Some(
                BatchBuilder::new()
                    .entry(stream_entry("a"))
                    .raw(json!({ "type": "GLOBAL", "data": 1 }))
                    .build(),
            ),
            stream_capable: true,
            expected: Err(StateError::MixedTypeBatch {
                index: 1,
                expected: StateType::Stream,
                found: Some(StateType::Global),
            }),
        },
        GoldenVector {
            name: "global pair with payload-less entry is duplicated",
            input: Some(
                BatchBuilder::new()
                    .entry(global)
                    .raw(json!({ "type": "GLOBAL", "data": 1 }))
                    .build(),
            ),
            stream_capable: true,
            expected: Err(StateError::DuplicatedGlobalState { count: 2 }),
        },
        GoldenVector {
            name: "payload-less global reduced to data",
            input: Some(json!([{ "type": "GLOBAL", "data": 1 }])),
            stream_capable: false,
            expected: Ok(Some(StateWrapper::Legacy(json!(1)))),
        },
        GoldenVector {
            name: "payload-less global rejected when read",
            input: Some(json!([{ "type": "GLOBAL", "data": 1 }])),
            stream_capable: true,
            expected: Err(StateError::InvalidPayload {
                index: 0,
                state_type: StateType::Global,
                reason: "missing `global` payload".into(),
            }),
        },
    ]
}

/// Run every vector and report `(name, passed)`.
pub fn verify_all_vectors() -> Vec<(String, bool)> {
    all_vectors()
        .iter()
        .map(|v| (v.name.to_string(), v.matches(&v.run())))
        .collect()
}
