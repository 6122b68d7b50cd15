//! Ports to the hosted backend: the document store and the team directory.
//!
//! - [`http`]: REST client for the hosted backend
//! - [`in_memory`]: process-local implementation for tests/dev
//! - [`query`]: list-endpoint query builder
//! - [`pagination`]: offset pagination with a page cap

pub mod http;
pub mod in_memory;
pub mod pagination;
pub mod query;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use medstock_core::{MembershipId, TeamId, UserId};
use medstock_teams::{Membership, NewMembership, Team};

pub use http::HttpBackend;
pub use in_memory::InMemoryBackend;
pub use pagination::{fetch_all, paginate};
pub use query::Query;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a response (connect, TLS, timeout...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A response or document did not have the expected shape.
    #[error("failed to decode {what}: {message}")]
    Decode { what: String, message: String },

    #[error("pagination aborted after {max_pages} pages")]
    PageLimitExceeded { max_pages: usize },
}

impl StoreError {
    pub fn decode(what: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            what: what.into(),
            message: message.to_string(),
        }
    }
}

/// One page of a document list call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    /// Total matches across all pages, as reported by the backend.
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub documents: Vec<JsonValue>,
}

/// Read access to document collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentPage, StoreError>;
}

/// Team and membership management.
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    /// `Ok(None)` when the team does not exist.
    async fn get_team(&self, team_id: &TeamId) -> Result<Option<Team>, StoreError>;

    /// One page of a team's memberships.
    async fn list_memberships(
        &self,
        team_id: &TeamId,
        queries: &[Query],
    ) -> Result<Vec<Membership>, StoreError>;

    async fn create_membership(
        &self,
        team_id: &TeamId,
        membership: &NewMembership,
    ) -> Result<Membership, StoreError>;

    async fn update_membership_roles(
        &self,
        team_id: &TeamId,
        membership_id: &MembershipId,
        roles: &[String],
    ) -> Result<Membership, StoreError>;

    /// Every membership of a user, across teams.
    async fn list_user_memberships(&self, user_id: &UserId) -> Result<Vec<Membership>, StoreError>;

    async fn delete_membership(
        &self,
        team_id: &TeamId,
        membership_id: &MembershipId,
    ) -> Result<(), StoreError>;
}
