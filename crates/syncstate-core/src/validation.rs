//! Batch consistency checks.

use crate::error::StateError;
use crate::types::StateType;

/// Check that every decoded element declares the same type as the first.
///
/// `None` marks an element without a discriminator. Returns the common type,
/// or `None` when the batch is empty or starts with an untyped element (only
/// the first element decides whether a batch is typed).
pub fn check_homogeneous(
    types: impl IntoIterator<Item = Option<StateType>>,
) -> Result<Option<StateType>, StateError> {
    let mut types = types.into_iter();

    let expected = match types.next() {
        Some(Some(ty)) => ty,
        Some(None) | None => return Ok(None),
    };

    for (offset, found) in types.enumerate() {
        if found != Some(expected) {
            return Err(StateError::MixedTypeBatch {
                index: offset + 1,
                expected,
                found,
            });
        }
    }

    Ok(Some(expected))
}

/// Require a GLOBAL batch to hold exactly one element and return it.
pub fn single_global<T>(entries: &[T]) -> Result<&T, StateError> {
    match entries {
        [only] => Ok(only),
        _ => Err(StateError::DuplicatedGlobalState {
            count: entries.len(),
        }),
    }
}
