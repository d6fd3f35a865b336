//! Error types for state classification.

use thiserror::Error;

use crate::types::StateType;

/// Fatal consistency errors raised while classifying a typed batch.
///
/// Each indicates a misbehaving producer. The classifier never repairs the
/// batch or returns a partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// An element declares a different type than the first element.
    /// `found` is `None` when the element carries no discriminator at all.
    #[error("mixed state types in batch: element {index} is {}, expected {expected}", display_found(.found))]
    MixedTypeBatch {
        index: usize,
        expected: StateType,
        found: Option<StateType>,
    },

    /// A GLOBAL batch holds more than one entry.
    #[error("duplicated global state: expected 1 entry, got {count}")]
    DuplicatedGlobalState { count: usize },

    /// A GLOBAL or STREAM entry the consumer must read lacks a decodable
    /// payload for its declared type.
    #[error("invalid {state_type} payload in element {index}: {reason}")]
    InvalidPayload {
        index: usize,
        state_type: StateType,
        reason: String,
    },
}

fn display_found(found: &Option<StateType>) -> &'static str {
    match found {
        Some(ty) => ty.as_str(),
        None => "untyped",
    }
}

/// Reasons a single raw element fails to decode as a [`crate::StateEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryDecodeError {
    /// The element has no `type` discriminator (missing or null).
    #[error("element has no type discriminator")]
    Untyped,

    /// The element is not a state entry at all.
    #[error("malformed state entry: {0}")]
    Malformed(String),
}

/// Result type for classification.
pub type Result<T> = std::result::Result<T, StateError>;
