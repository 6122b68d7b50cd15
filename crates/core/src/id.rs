//! Strongly-typed identifiers used across the domain.
//!
//! The document store keys every record with a short string id
//! (`[a-zA-Z0-9][a-zA-Z0-9._-]{0,35}`). The newtypes below keep document,
//! team, user and membership ids from being mixed up at call sites.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Maximum id length accepted by the document store.
pub const MAX_ID_LEN: usize = 36;

/// Identifier of a document inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

/// Identifier of a team.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

/// Identifier of a user account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of a team membership.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipId(String);

fn validate(name: &str, s: &str) -> Result<(), DomainError> {
    if s.is_empty() {
        return Err(DomainError::invalid_id(format!("{name}: empty")));
    }
    if s.len() > MAX_ID_LEN {
        return Err(DomainError::invalid_id(format!(
            "{name}: longer than {MAX_ID_LEN} characters"
        )));
    }
    let mut chars = s.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if !(first_ok && rest_ok) {
        return Err(DomainError::invalid_id(format!("{name}: invalid characters in {s:?}")));
    }
    Ok(())
}

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Generate a fresh identifier.
            ///
            /// Uses a UUIDv7 (time-ordered) rendered without hyphens.
            pub fn unique() -> Self {
                Self(Uuid::now_v7().simple().to_string())
            }

            /// Wrap a raw id without validation.
            ///
            /// Ids read back from the store are trusted as-is.
            pub fn from_raw(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                validate($name, s)?;
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_string_newtype!(DocumentId, "DocumentId");
impl_string_newtype!(TeamId, "TeamId");
impl_string_newtype!(UserId, "UserId");
impl_string_newtype!(MembershipId, "MembershipId");
