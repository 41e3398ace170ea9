//! # stix-core — Primitive Types for STIX Objects
//!
//! This crate defines the validated primitives every STIX property is built
//! from. Each newtype enforces its format at construction, so a value that
//! exists is a value that serializes correctly.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for property primitives.** `Timestamp`, `StixId`,
//!    `Hashes`, `Binary`: no bare strings for formatted values.
//!
//! 2. **`CanonicalBytes` newtype.** Deterministic identifiers are derived
//!    only from `CanonicalBytes`, which is JCS output with floats rejected.
//!
//! 3. **UTC-only timestamps.** `Timestamp` normalizes offsets to UTC and
//!    truncates to whole seconds at parse time.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `stix-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod binary;
pub mod canonical;
pub mod error;
pub mod hashes;
pub mod identity;
pub mod temporal;

pub use binary::Binary;
pub use canonical::CanonicalBytes;
pub use error::{CanonicalizationError, PrimitiveError};
pub use hashes::{HashAlgorithm, Hashes};
pub use identity::{validate_type_name, StixId, SCO_ID_NAMESPACE};
pub use temporal::Timestamp;
