//! Record identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModelError;

/// Identifier of a model record.
///
/// Identifiers are opaque strings. Records built without an explicit id get a
/// random UUIDv4; callers may also supply their own (e.g. `"P3001"`), which
/// the demo data does for every entity that has a natural key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Generate a fresh random identifier (UUIDv4, 122 random bits).
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the identifier is a syntactically valid UUID.
    pub fn is_uuid(&self) -> bool {
        Uuid::parse_str(&self.0).is_ok()
    }
}

impl core::fmt::Display for ModelId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ModelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ModelId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&ModelId> for ModelId {
    fn from(value: &ModelId) -> Self {
        value.clone()
    }
}

impl From<Uuid> for ModelId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for ModelId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ModelError::invalid_id("ModelId: empty identifier"));
        }
        Ok(Self(trimmed.to_string()))
    }
}
