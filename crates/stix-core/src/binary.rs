//! # Binary Payloads
//!
//! [`Binary`] holds a base64-encoded payload (`payload_bin`). The encoded
//! text is validated once at construction and kept verbatim, so serialized
//! output reproduces the producer's encoding byte for byte.
//!
//! Decoding is strict about the alphabet, length and padding, and lenient
//! about non-zero trailing bits in the final quantum. Many producers emit
//! such payloads and the decoded bytes are unambiguous.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PrimitiveError;

const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// A validated base64 payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binary(String);

impl Binary {
    /// Validate `encoded` as standard base64 with canonical padding.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidBinary`] for characters outside the
    /// alphabet, a length that is not a multiple of four, or misplaced
    /// padding.
    pub fn new(encoded: impl Into<String>) -> Result<Self, PrimitiveError> {
        let encoded = encoded.into();
        PAYLOAD_ENGINE
            .decode(encoded.as_bytes())
            .map_err(|e| PrimitiveError::InvalidBinary {
                reason: e.to_string(),
            })?;
        Ok(Self(encoded))
    }

    /// Encode raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(PAYLOAD_ENGINE.encode(bytes))
    }

    /// The encoded text as supplied.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the payload.
    ///
    /// # Errors
    ///
    /// Never fails for a constructed value; the `Result` mirrors the decoder.
    pub fn decode(&self) -> Result<Vec<u8>, PrimitiveError> {
        PAYLOAD_ENGINE
            .decode(self.0.as_bytes())
            .map_err(|e| PrimitiveError::InvalidBinary {
                reason: e.to_string(),
            })
    }
}

impl std::fmt::Display for Binary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Binary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Binary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
