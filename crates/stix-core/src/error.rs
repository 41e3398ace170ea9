//! # Error Hierarchy
//!
//! Structured errors for the primitive types in this crate, built with
//! `thiserror`. Each variant carries the rejected input and the expected
//! format so a caller can report the defect without re-deriving it.

use thiserror::Error;

/// Errors during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed during canonicalization.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Validation errors for primitive newtypes.
///
/// Each primitive enforces its format at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Timestamp string is not a valid ISO 8601 instant with offset.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Identifier does not have the `<type>--<uuid>` shape.
    #[error("invalid identifier: \"{value}\" ({reason})")]
    InvalidIdentifier {
        /// The rejected identifier.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Object type name violates the naming rules.
    #[error("invalid type name: \"{0}\" (expected 3-250 characters of a-z, 0-9 and single hyphens)")]
    InvalidTypeName(String),

    /// Binary payload is not valid base64.
    #[error("invalid base64 payload: {reason}")]
    InvalidBinary {
        /// Decoder diagnostic.
        reason: String,
    },

    /// Hash digest does not match the format of its algorithm.
    #[error("invalid {algorithm} digest \"{value}\" (expected {expected})")]
    InvalidHash {
        /// Algorithm name as given.
        algorithm: String,
        /// The rejected digest.
        value: String,
        /// Expected digest shape.
        expected: String,
    },

    /// A hashes mapping must name at least one algorithm.
    #[error("hashes must contain at least one entry")]
    EmptyHashes,
}
