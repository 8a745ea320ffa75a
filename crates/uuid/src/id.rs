//! Canonical medication record identifiers.

use crate::{IdError, IdResult};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Canonical record identifier (32 lowercase hex characters, no hyphens).
///
/// Once constructed the contained UUID is known to be valid, so callers can derive
/// storage paths from it without further checks.
///
/// # Construction
/// - [`MedicationId::new`] generates a fresh identifier for a new record.
/// - [`MedicationId::parse`] validates an externally supplied identifier.
///
/// # Display format
/// Always the canonical 32-character lowercase form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MedicationId(Uuid);

impl Default for MedicationId {
    fn default() -> Self {
        Self::new()
    }
}

impl MedicationId {
    /// Generates a new random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// Hyphenated or uppercase forms are **not** normalised; they are rejected so that one
    /// record can never be reachable under two spellings.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is not canonical.
    pub fn parse(input: &str) -> IdResult<Self> {
        if !Self::is_canonical(input) {
            return Err(IdError::InvalidInput(format!(
                "id must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }

        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| IdError::InvalidInput(e.to_string()))
    }

    /// Returns true if `input` is exactly 32 characters of `0-9a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns `parent_dir/<s1>/<s2>/<id>/` where `s1`/`s2` are the first two pairs of
    /// hex characters of this id.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.0.simple().to_string();
        let s1 = &canonical[0..2];
        let s2 = &canonical[2..4];
        parent_dir.join(s1).join(s2).join(&canonical)
    }
}

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for MedicationId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MedicationId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MedicationId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for MedicationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MedicationId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_canonical_id() {
        let id = MedicationId::new();
        let canonical = id.to_string();

        assert_eq!(canonical.len(), 32);
        assert!(MedicationId::is_canonical(&canonical));
    }

    #[test]
    fn test_parse_valid_canonical_id() {
        let canonical = "550e8400e29b41d4a716446655440000";
        let id = MedicationId::parse(canonical).expect("canonical id should parse");

        assert_eq!(id.to_string(), canonical);
    }

    #[test]
    fn test_parse_rejects_hyphenated_id() {
        let result = MedicationId::parse("550e8400-e29b-41d4-a716-446655440000");

        match result {
            Err(IdError::InvalidInput(msg)) => {
                assert!(msg.contains("32 lowercase hex characters"));
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_parse_rejects_uppercase_and_bad_lengths() {
        assert!(MedicationId::parse("550E8400E29B41D4A716446655440000").is_err());
        assert!(MedicationId::parse("550e8400e29b41d4a71644665544000").is_err());
        assert!(MedicationId::parse("550e8400e29b41d4a7164466554400000").is_err());
        assert!(MedicationId::parse("missing-id").is_err());
        assert!(MedicationId::parse("").is_err());
    }

    #[test]
    fn test_sharded_dir_structure() {
        let id = MedicationId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let sharded = id.sharded_dir(Path::new("/data/medications"));

        assert_eq!(
            sharded,
            PathBuf::from("/data/medications/55/0e/550e8400e29b41d4a716446655440000")
        );
    }

    #[test]
    fn test_from_str_matches_parse() {
        let id: MedicationId = "aabbccddeeff00112233445566778899".parse().unwrap();
        assert_eq!(id.to_string(), "aabbccddeeff00112233445566778899");
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = MedicationId::parse("00112233445566778899aabbccddeeff").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00112233445566778899aabbccddeeff\"");

        let back: MedicationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let err = serde_json::from_str::<MedicationId>("\"not-an-id\"");
        assert!(err.is_err());
    }
}
