//! Canonical entity identifier.
//!
//! The catalog API is not consistent about identifier typing: the same id can
//! arrive as `1` in one payload and `"1"` in another. Everything is parsed into
//! an [`EntityId`] once, at the boundary, and compared only in that form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CascadeError, CascadeResult};

/// Identifier of any catalog entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Parse an identifier from raw text.
    ///
    /// Surrounding whitespace is dropped; empty input is rejected.
    pub fn parse(raw: &str) -> CascadeResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CascadeError::InvalidIdentifier {
                raw: raw.to_string(),
                reason: "identifier is empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = CascadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawId::deserialize(deserializer)? {
            RawId::Unsigned(n) => Ok(Self(n.to_string())),
            RawId::Signed(n) => Ok(Self(n.to_string())),
            RawId::Text(s) => EntityId::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}
