use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Store-assigned document identifier.
///
/// Identifiers use the MongoDB ObjectId format: 12 bytes rendered as 24
/// lowercase hex characters. Parsing only checks the format, never existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(ObjectId);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid identifier '{raw}'")]
pub struct MalformedIdentifier {
    pub raw: String,
}

impl Identifier {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Parse an externally supplied identifier string
    pub fn parse(raw: &str) -> Result<Self, MalformedIdentifier> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| MalformedIdentifier {
                raw: raw.to_string(),
            })
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl FromStr for Identifier {
    type Err = MalformedIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Identifier::parse(&raw).map_err(serde::de::Error::custom)
    }
}
