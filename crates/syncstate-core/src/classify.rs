//! Classification of raw checkpoint JSON into a [`StateWrapper`].
//!
//! Rules, in order:
//!
//! 1. Absent, `null`, or an empty list: no state.
//! 2. Anything that is not a list: an opaque LEGACY blob.
//! 3. A list containing an element that is not an object or carries an
//!    unknown `type`, or whose first element has no `type`: the whole list
//!    is a LEGACY blob.
//! 4. A typed batch: every element must share the first element's type.
//!    Without stream capability the batch collapses to LEGACY using the last
//!    element's `data`. GLOBAL batches must hold exactly one entry. STREAM
//!    batches keep every entry in order.
//!
//! Only discriminators are read before step 4. Payloads are decoded once
//! the batch is known to be GLOBAL or STREAM for this consumer, so a
//! missing payload never hides an inconsistent batch.

use serde_json::Value;

use crate::entry::{json_kind, read_data, read_type, StateEntry};
use crate::error::{EntryDecodeError, Result, StateError};
use crate::types::StateType;
use crate::validation::{check_homogeneous, single_global};
use crate::wrapper::StateWrapper;

/// Classify a raw checkpoint.
///
/// `stream_capable = false` means the consumer only understands LEGACY
/// checkpoints, so typed batches are reduced to their legacy `data`.
///
/// Returns `Ok(None)` when there is no prior checkpoint. Mixed-type batches,
/// GLOBAL batches with more than one entry, and GLOBAL or STREAM entries
/// without a decodable payload are errors.
pub fn classify(raw: Option<&Value>, stream_capable: bool) -> Result<Option<StateWrapper>> {
    let items = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(doc) => {
            tracing::debug!(kind = json_kind(doc), "opaque checkpoint document, using legacy state");
            return Ok(Some(StateWrapper::Legacy(doc.clone())));
        }
    };

    let last_raw = match items.last() {
        Some(last) => last,
        None => return Ok(None),
    };

    let types: Vec<std::result::Result<StateType, EntryDecodeError>> =
        items.iter().map(read_type).collect();

    if let Some((index, reason)) = first_malformed(&types) {
        tracing::debug!(index, reason, "list does not match the state entry schema, using legacy state");
        return Ok(Some(legacy_list(items)));
    }

    let declared = check_homogeneous(types.iter().map(|t| t.as_ref().ok().copied()))
        .map_err(reject)?;

    let declared = match declared {
        Some(ty) => ty,
        None => {
            tracing::debug!(len = items.len(), "untyped checkpoint list, using legacy state");
            return Ok(Some(legacy_list(items)));
        }
    };

    let effective = if stream_capable {
        declared
    } else {
        if declared != StateType::Legacy {
            tracing::debug!(declared = %declared, "consumer is not stream capable, reducing to legacy state");
        }
        StateType::Legacy
    };

    let wrapper = match effective {
        StateType::Legacy => {
            let legacy = read_data(last_raw).unwrap_or(last_raw).clone();
            StateWrapper::Legacy(legacy)
        }
        StateType::Global => {
            let raw_entry = single_global(items.as_slice()).map_err(reject)?;
            StateWrapper::Global(decode_entry(0, raw_entry, effective)?)
        }
        StateType::Stream => {
            let entries = items
                .iter()
                .enumerate()
                .map(|(index, raw_entry)| decode_entry(index, raw_entry, effective))
                .collect::<Result<Vec<_>>>()?;
            StateWrapper::Stream(entries)
        }
    };

    Ok(Some(wrapper))
}

fn decode_entry(index: usize, raw: &Value, state_type: StateType) -> Result<StateEntry> {
    StateEntry::decode(raw).map_err(|e| {
        reject(StateError::InvalidPayload {
            index,
            state_type,
            reason: match e {
                EntryDecodeError::Malformed(reason) => reason,
                other => other.to_string(),
            },
        })
    })
}

fn reject(e: StateError) -> StateError {
    tracing::warn!("rejecting checkpoint batch: {}", e);
    e
}

fn first_malformed(
    types: &[std::result::Result<StateType, EntryDecodeError>],
) -> Option<(usize, &str)> {
    types.iter().enumerate().find_map(|(i, t)| match t {
        Err(EntryDecodeError::Malformed(reason)) => Some((i, reason.as_str())),
        _ => None,
    })
}

fn legacy_list(items: &[Value]) -> StateWrapper {
    StateWrapper::Legacy(Value::Array(items.to_vec()))
}
