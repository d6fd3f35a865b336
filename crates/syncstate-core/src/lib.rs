//! # Syncstate Core
//!
//! Pure primitives for classifying sync checkpoints ("state").
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over `serde_json` values.
//!
//! ## Key Types
//!
//! - [`StateEntry`] - One element of a new-format checkpoint batch
//! - [`StateType`] - Discriminator: LEGACY, GLOBAL or STREAM
//! - [`StateWrapper`] - The single typed checkpoint a consumer reasons about
//! - [`StateError`] - Fatal batch inconsistencies
//!
//! ## Classification
//!
//! ```rust
//! use serde_json::json;
//! use syncstate_core::{classify, StateType};
//!
//! let raw = json!([{
//!     "type": "STREAM",
//!     "stream": { "stream_descriptor": { "name": "users" }, "stream_state": { "cursor": 3 } }
//! }]);
//!
//! let wrapper = classify(Some(&raw), true).unwrap().unwrap();
//! assert_eq!(wrapper.state_type(), StateType::Stream);
//! ```

pub mod classify;
pub mod entry;
pub mod error;
pub mod types;
pub mod validation;
pub mod wrapper;

pub use classify::classify;
pub use entry::{EntryPayload, GlobalPayload, StateEntry, StreamPayload};
pub use error::{EntryDecodeError, Result, StateError};
pub use types::{CheckpointHash, StateType, StreamDescriptor};
pub use validation::{check_homogeneous, single_global};
pub use wrapper::StateWrapper;
