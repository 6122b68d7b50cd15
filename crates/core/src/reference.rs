//! References between documents.
//!
//! Relationship attributes come back from the store in one of three shapes:
//! a bare id string, the related document expanded inline, or `null`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::id::DocumentId;

/// A (possibly missing) reference to another document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Reference {
    #[default]
    Missing,
    Id(DocumentId),
}

impl Reference {
    pub fn to(id: impl Into<String>) -> Self {
        Self::Id(DocumentId::from_raw(id))
    }

    pub fn id(&self) -> Option<&DocumentId> {
        match self {
            Self::Id(id) => Some(id),
            Self::Missing => None,
        }
    }

    /// The referenced id, or `""` when missing. Used for grouping keys.
    pub fn key(&self) -> &str {
        self.id().map(DocumentId::as_str).unwrap_or("")
    }

    pub fn points_to(&self, id: &DocumentId) -> bool {
        self.id() == Some(id)
    }
}

impl From<DocumentId> for Reference {
    fn from(value: DocumentId) -> Self {
        Self::Id(value)
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Id(id) => serializer.serialize_str(id.as_str()),
            Self::Missing => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        Ok(match raw {
            JsonValue::String(s) if !s.is_empty() => Self::to(s),
            JsonValue::Object(map) => match map.get("$id") {
                Some(JsonValue::String(s)) if !s.is_empty() => Self::to(s.clone()),
                _ => Self::Missing,
            },
            // Two-way relationships may surface as single-element arrays.
            JsonValue::Array(items) => match items.into_iter().next() {
                Some(JsonValue::String(s)) if !s.is_empty() => Self::to(s),
                Some(JsonValue::Object(map)) => match map.get("$id") {
                    Some(JsonValue::String(s)) if !s.is_empty() => Self::to(s.clone()),
                    _ => Self::Missing,
                },
                _ => Self::Missing,
            },
            _ => Self::Missing,
        })
    }
}
