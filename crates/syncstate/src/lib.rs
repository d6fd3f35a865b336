//! # Syncstate
//!
//! The unified API for classifying sync checkpoints ("state").
//!
//! ## Overview
//!
//! Producers of different ages emit checkpoints in three shapes:
//!
//! - **Legacy**: a free-form JSON blob
//! - **Global**: one shared payload plus per-stream sub-states
//! - **Stream**: a list with one independent entry per stream
//!
//! A [`Classifier`] turns any of them into a single [`StateWrapper`] so
//! consumers reason about exactly one canonical shape.
//!
//! ## Key Concepts
//!
//! - **Homogeneous batch**: every entry of a typed list shares one `type`.
//! - **Single global**: a GLOBAL batch holds exactly one entry.
//! - **Stream capability**: consumers that only understand legacy
//!   checkpoints get the `data` shadow of the last entry instead.
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use syncstate::{Classifier, ClassifierConfig, StateType};
//!
//! let raw = json!([
//!     { "type": "STREAM", "data": 1,
//!       "stream": { "stream_descriptor": { "name": "a" }, "stream_state": {} } },
//!     { "type": "STREAM", "data": 2,
//!       "stream": { "stream_descriptor": { "name": "b" }, "stream_state": {} } }
//! ]);
//!
//! let wrapper = Classifier::default().classify(Some(&raw)).unwrap().unwrap();
//! assert_eq!(wrapper.state_type(), StateType::Stream);
//!
//! let legacy = Classifier::new(ClassifierConfig::legacy_only())
//!     .classify(Some(&raw))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(legacy.legacy_state(), Some(&json!(2)));
//! ```
//!
//! ## Re-exports
//!
//! - `syncstate::core` - Core primitives (StateEntry, StateWrapper, classify)

pub mod classifier;
pub mod error;

pub use syncstate_core as core;

pub use classifier::{Classifier, ClassifierConfig};
pub use error::{Result, SyncStateError};

pub use syncstate_core::{
    CheckpointHash, EntryPayload, GlobalPayload, StateEntry, StateError, StateType,
    StateWrapper, StreamDescriptor, StreamPayload,
};
