//! # Hash Digests
//!
//! The `hashes` property maps an algorithm name to a digest string. Known
//! algorithms are recognized case- and punctuation-insensitively (`md5`,
//! `Sha256`, `SHA_256`) and stored under their canonical spelling; their
//! digests must match the algorithm's length and alphabet. Other algorithm
//! names are kept verbatim as custom hashes with a non-empty value.

use std::collections::BTreeMap;

use crate::error::PrimitiveError;

/// Hash algorithms with a fixed digest format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashAlgorithm {
    /// MD5, 128-bit.
    Md5,
    /// SHA-1, 160-bit.
    Sha1,
    /// SHA-256.
    Sha256,
    /// SHA-512.
    Sha512,
    /// SHA3-256.
    Sha3_256,
    /// SHA3-512.
    Sha3_512,
    /// ssdeep context-triggered piecewise hash.
    Ssdeep,
    /// Trend Micro locality-sensitive hash.
    Tlsh,
}

impl HashAlgorithm {
    /// All recognized algorithms.
    pub const ALL: [HashAlgorithm; 8] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha256,
        Self::Sha512,
        Self::Sha3_256,
        Self::Sha3_512,
        Self::Ssdeep,
        Self::Tlsh,
    ];

    /// Canonical spelling used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
            Self::Sha3_256 => "SHA3-256",
            Self::Sha3_512 => "SHA3-512",
            Self::Ssdeep => "SSDEEP",
            Self::Tlsh => "TLSH",
        }
    }

    /// Recognize an algorithm name, ignoring case, `-` and `_`.
    pub fn from_name(name: &str) -> Option<Self> {
        let folded: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Self::ALL.into_iter().find(|alg| {
            alg.as_str()
                .chars()
                .filter(|c| *c != '-')
                .eq(folded.chars())
        })
    }

    /// Human-readable description of the expected digest.
    pub fn expected_format(&self) -> String {
        match self.hex_len() {
            Some(len) => format!("{len} hexadecimal characters"),
            None => match self {
                Self::Ssdeep => "<blocksize>:<base64 chunk>:<base64 chunk>".to_string(),
                _ => "70 hexadecimal characters, optionally prefixed with T1".to_string(),
            },
        }
    }

    /// Check a digest against this algorithm's format.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidHash`] when the digest does not match.
    pub fn check_digest(&self, digest: &str) -> Result<(), PrimitiveError> {
        let ok = match (self, self.hex_len()) {
            (_, Some(len)) => is_hex_of_len(digest, len),
            (Self::Ssdeep, None) => is_ssdeep(digest),
            _ => {
                let body = digest.strip_prefix("T1").unwrap_or(digest);
                is_hex_of_len(body, 70)
            }
        };
        if ok {
            Ok(())
        } else {
            Err(PrimitiveError::InvalidHash {
                algorithm: self.as_str().to_string(),
                value: digest.to_string(),
                expected: self.expected_format(),
            })
        }
    }

    fn hex_len(&self) -> Option<usize> {
        match self {
            Self::Md5 => Some(32),
            Self::Sha1 => Some(40),
            Self::Sha256 | Self::Sha3_256 => Some(64),
            Self::Sha512 | Self::Sha3_512 => Some(128),
            Self::Ssdeep | Self::Tlsh => None,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_hex_of_len(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_ssdeep(s: &str) -> bool {
    let is_chunk = |c: &str| {
        !c.is_empty()
            && c.bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'/' || b == b'+')
    };
    let mut parts = s.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(block), Some(first), Some(second)) => {
            // The second chunk may carry a trailing ,"<filename>" suffix.
            let second = second.split_once(',').map_or(second, |(chunk, _)| chunk);
            !block.is_empty()
                && block.bytes().all(|b| b.is_ascii_digit())
                && is_chunk(first)
                && is_chunk(second)
        }
        _ => false,
    }
}

/// A validated, non-empty algorithm → digest mapping.
///
/// Keys of recognized algorithms are stored in canonical spelling; the map
/// iterates in key order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hashes(BTreeMap<String, String>);

impl Hashes {
    /// Validate and normalize a set of `(algorithm, digest)` entries.
    ///
    /// # Errors
    ///
    /// - [`PrimitiveError::EmptyHashes`] when no entry is given.
    /// - [`PrimitiveError::InvalidHash`] when a digest does not match its
    ///   algorithm, a custom algorithm name is not 3-250 characters of
    ///   `[A-Za-z0-9_-]`, a custom digest is empty, or two entries
    ///   normalize to the same algorithm.
    pub fn new<I, K, V>(entries: I) -> Result<Self, PrimitiveError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (name, digest) in entries {
            let name = name.as_ref();
            let digest = digest.into();
            let key = Self::check_entry(name, &digest)?;
            if map.contains_key(&key) {
                return Err(PrimitiveError::InvalidHash {
                    algorithm: name.to_string(),
                    value: digest,
                    expected: format!("a single {key} entry"),
                });
            }
            map.insert(key, digest);
        }
        if map.is_empty() {
            return Err(PrimitiveError::EmptyHashes);
        }
        Ok(Self(map))
    }

    /// Check one `(algorithm, digest)` entry and return the key it is
    /// stored under.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidHash`] when the digest does not match
    /// a recognized algorithm, or the custom name or digest is malformed.
    pub fn check_entry(name: &str, digest: &str) -> Result<String, PrimitiveError> {
        match HashAlgorithm::from_name(name) {
            Some(alg) => {
                alg.check_digest(digest)?;
                Ok(alg.as_str().to_string())
            }
            None => {
                check_custom_entry(name, digest)?;
                Ok(name.to_string())
            }
        }
    }

    /// Look up a digest by algorithm name (canonical spelling for known
    /// algorithms).
    pub fn get(&self, algorithm: &str) -> Option<&str> {
        self.0.get(algorithm).map(String::as_str)
    }

    /// Iterate `(algorithm, digest)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed value; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The single entry used for deterministic identifiers: MD5, then
    /// SHA-1, SHA-256, SHA-512, else the first entry in key order.
    pub fn preferred(&self) -> Option<(&str, &str)> {
        [
            HashAlgorithm::Md5,
            HashAlgorithm::Sha1,
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha512,
        ]
        .iter()
        .find_map(|alg| self.0.get_key_value(alg.as_str()))
        .or_else(|| self.0.iter().next())
        .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn check_custom_entry(name: &str, digest: &str) -> Result<(), PrimitiveError> {
    let name_ok = (3..=250).contains(&name.len())
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if name_ok && !digest.is_empty() {
        Ok(())
    } else {
        Err(PrimitiveError::InvalidHash {
            algorithm: name.to_string(),
            value: digest.to_string(),
            expected: "a 3-250 character algorithm name of [A-Za-z0-9_-] with a non-empty digest"
                .to_string(),
        })
    }
}
