//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines [`Timestamp`], the normalized instant used by every timestamp
//! property (`created`, `modified`, `first_observed`, `last_observed`).
//!
//! ## Normalization Policy
//!
//! Input may carry fractional seconds and either a `Z` suffix or an explicit
//! UTC offset. Offsets are converted to UTC and sub-second precision is
//! truncated (not rounded) at parse time, so the stored value is always the
//! one the canonical form renders:
//!
//! ```text
//! 2016-04-06T19:58:16.123+02:00  ->  2016-04-06T17:58:16Z
//! ```
//!
//! Because both parse and format truncate, `parse(format(parse(s)))` equals
//! `parse(s)` for every accepted `s`.

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PrimitiveError;

/// A UTC timestamp with whole-second precision.
///
/// Renders as `YYYY-MM-DDTHH:MM:SSZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an ISO 8601 timestamp, converting any offset to UTC.
    ///
    /// Accepts RFC 3339 strings (`2016-04-06T19:58:16Z`,
    /// `2016-04-06T19:58:16.123+05:30`) and the compact offset form
    /// (`2016-04-06T19:58:16+0530`). A zone designator is mandatory, and
    /// the separator and UTC designator must be the uppercase `T` and `Z`.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidTimestamp`] when the string is not a
    /// complete date-time with a zone designator.
    pub fn parse(s: &str) -> Result<Self, PrimitiveError> {
        if s.as_bytes().get(10) != Some(&b'T') || s.ends_with('z') {
            return Err(PrimitiveError::InvalidTimestamp {
                value: s.to_string(),
                reason: "expected an uppercase 'T' separator and 'Z' designator".to_string(),
            });
        }
        let parsed = DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::<FixedOffset>::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
            .map_err(|e| PrimitiveError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self(truncate_to_seconds(parsed.with_timezone(&Utc))))
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO 8601 with `Z` suffix and whole seconds.
    pub fn to_canonical_string(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl std::str::FromStr for Timestamp {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
