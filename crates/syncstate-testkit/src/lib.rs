//! # Syncstate Testkit
//!
//! Testing utilities for syncstate.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known classification scenarios with expected outcomes
//! - **Generators**: Proptest strategies for entries, batches, and JSON values
//! - **Fixtures**: Builders for entries and raw checkpoint lists
//!
//! ## Golden Vectors
//!
//! ```rust
//! use syncstate_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     assert!(vector.matches(&vector.run()), "{}", vector.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use syncstate_testkit::generators::TypedBatch;
//!
//! proptest! {
//!     #[test]
//!     fn typed_batches_classify(batch: TypedBatch) {
//!         let raw = batch.to_json();
//!         prop_assert!(syncstate_core::classify(Some(&raw), true).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use syncstate_testkit::fixtures::BatchBuilder;
//!
//! let raw = BatchBuilder::new().streams(&["users", "orders"]).build();
//! assert_eq!(raw.as_array().map(Vec::len), Some(2));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{batch, global_entry, legacy_entry, stream_entry, BatchBuilder};
pub use generators::TypedBatch;
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
