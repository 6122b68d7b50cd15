//! In-memory backend.
//!
//! Intended for tests/dev. Applies `equal`, `limit` and `offset` queries the
//! way the hosted backend does, and keeps a log of every list call so tests
//! can assert on pagination.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value as JsonValue};

use medstock_core::{DocumentId, MembershipId, TeamId, UserId};
use medstock_teams::{Membership, NewMembership, Team};

use super::{DocumentPage, DocumentStore, Query, StoreError, TeamDirectory};

/// A recorded list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub collection_id: String,
    pub returned: usize,
}

#[derive(Debug, Default)]
pub struct InMemoryBackend {
    collections: RwLock<HashMap<(String, String), Vec<JsonValue>>>,
    teams: RwLock<Vec<Team>>,
    memberships: RwLock<Vec<Membership>>,
    calls: Mutex<Vec<ListCall>>,
    fail_collection: RwLock<Option<String>>,
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn lock_err<T>(_: T) -> StoreError {
    StoreError::Transport("lock poisoned".to_string())
}

/// Compare a document attribute with a query value. Relationship attributes
/// match on the related document's `$id`.
fn value_matches(attr: &JsonValue, wanted: &JsonValue) -> bool {
    match attr {
        JsonValue::Object(map) => map.get("$id").is_some_and(|id| id == wanted),
        JsonValue::Array(items) => items.iter().any(|item| value_matches(item, wanted)),
        other => other == wanted,
    }
}

fn matches_filters(doc: &JsonValue, queries: &[Query]) -> bool {
    queries.iter().all(|q| match q {
        Query::Equal { attribute, values } => {
            let attr = doc.get(attribute).unwrap_or(&JsonValue::Null);
            values.iter().any(|v| value_matches(attr, v))
        }
        Query::Limit(_) | Query::Offset(_) => true,
    })
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, filling in `$id` and `$createdAt` when absent.
    pub fn insert_document(&self, database_id: &str, collection_id: &str, document: JsonValue) -> DocumentId {
        let mut map = match document {
            JsonValue::Object(map) => map,
            _ => Map::new(),
        };
        let id = match map.get("$id").and_then(JsonValue::as_str) {
            Some(id) => DocumentId::from_raw(id),
            None => DocumentId::unique(),
        };
        map.insert("$id".to_string(), JsonValue::from(id.as_str()));
        map.entry("$collectionId".to_string())
            .or_insert_with(|| JsonValue::from(collection_id));
        map.entry("$createdAt".to_string())
            .or_insert_with(|| JsonValue::from(now_stamp()));

        if let Ok(mut cols) = self.collections.write() {
            cols.entry((database_id.to_string(), collection_id.to_string()))
                .or_default()
                .push(JsonValue::Object(map));
        }
        id
    }

    pub fn insert_team(&self, team_id: &str, name: &str) -> TeamId {
        let id = TeamId::from_raw(team_id);
        if let Ok(mut teams) = self.teams.write() {
            teams.push(Team {
                id: id.clone(),
                name: name.to_string(),
                total: 0,
            });
        }
        id
    }

    pub fn insert_membership(&self, membership: Membership) {
        if let Ok(mut all) = self.memberships.write() {
            all.push(membership);
        }
    }

    pub fn memberships(&self) -> Vec<Membership> {
        self.memberships.read().map(|m| m.clone()).unwrap_or_default()
    }

    /// List calls made so far, oldest first.
    pub fn list_calls(&self) -> Vec<ListCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Make every list call on `collection_id` fail.
    pub fn fail_collection(&self, collection_id: &str) {
        if let Ok(mut f) = self.fail_collection.write() {
            *f = Some(collection_id.to_string());
        }
    }

    fn user_id_for_email(&self, email: &str) -> Option<UserId> {
        self.memberships
            .read()
            .ok()?
            .iter()
            .find(|m| m.user_email.eq_ignore_ascii_case(email))
            .map(|m| m.user_id.clone())
    }
}

#[async_trait]
impl DocumentStore for InMemoryBackend {
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentPage, StoreError> {
        if self.fail_collection.read().map_err(lock_err)?.as_deref() == Some(collection_id) {
            return Err(StoreError::Api {
                status: 503,
                message: format!("collection {collection_id} unavailable"),
            });
        }

        let cols = self.collections.read().map_err(lock_err)?;
        let matching: Vec<&JsonValue> = cols
            .get(&(database_id.to_string(), collection_id.to_string()))
            .map(|docs| docs.iter().filter(|d| matches_filters(d, queries)).collect())
            .unwrap_or_default();

        let mut limit = 25;
        let mut offset = 0;
        for q in queries {
            match q {
                Query::Limit(n) => limit = *n,
                Query::Offset(n) => offset = *n,
                Query::Equal { .. } => {}
            }
        }

        let documents: Vec<JsonValue> = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|d| (*d).clone())
            .collect();

        self.calls.lock().map_err(lock_err)?.push(ListCall {
            collection_id: collection_id.to_string(),
            returned: documents.len(),
        });

        Ok(DocumentPage {
            total: matching.len() as u64,
            documents,
        })
    }
}

#[async_trait]
impl TeamDirectory for InMemoryBackend {
    async fn get_team(&self, team_id: &TeamId) -> Result<Option<Team>, StoreError> {
        let teams = self.teams.read().map_err(lock_err)?;
        Ok(teams.iter().find(|t| &t.id == team_id).cloned())
    }

    async fn list_memberships(
        &self,
        team_id: &TeamId,
        queries: &[Query],
    ) -> Result<Vec<Membership>, StoreError> {
        let mut limit = 25;
        let mut offset = 0;
        for q in queries {
            match q {
                Query::Limit(n) => limit = *n,
                Query::Offset(n) => offset = *n,
                Query::Equal { .. } => {}
            }
        }
        let all = self.memberships.read().map_err(lock_err)?;
        Ok(all
            .iter()
            .filter(|m| &m.team_id == team_id)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn create_membership(
        &self,
        team_id: &TeamId,
        membership: &NewMembership,
    ) -> Result<Membership, StoreError> {
        let team_name = self
            .get_team(team_id)
            .await?
            .map(|t| t.name)
            .ok_or_else(|| StoreError::Api {
                status: 404,
                message: format!("team {team_id} not found"),
            })?;

        let user_id = membership
            .user_id
            .clone()
            .or_else(|| self.user_id_for_email(&membership.email))
            .unwrap_or_else(UserId::unique);

        let created = Membership {
            id: MembershipId::unique(),
            team_id: team_id.clone(),
            team_name,
            user_id,
            user_email: membership.email.clone(),
            user_name: membership.name.clone().unwrap_or_default(),
            roles: membership.roles.clone(),
            confirm: true,
        };
        self.memberships.write().map_err(lock_err)?.push(created.clone());
        Ok(created)
    }

    async fn update_membership_roles(
        &self,
        team_id: &TeamId,
        membership_id: &MembershipId,
        roles: &[String],
    ) -> Result<Membership, StoreError> {
        let mut all = self.memberships.write().map_err(lock_err)?;
        let m = all
            .iter_mut()
            .find(|m| &m.id == membership_id && &m.team_id == team_id)
            .ok_or_else(|| StoreError::Api {
                status: 404,
                message: format!("membership {membership_id} not found"),
            })?;
        m.roles = roles.to_vec();
        Ok(m.clone())
    }

    async fn list_user_memberships(&self, user_id: &UserId) -> Result<Vec<Membership>, StoreError> {
        let all = self.memberships.read().map_err(lock_err)?;
        Ok(all.iter().filter(|m| &m.user_id == user_id).cloned().collect())
    }

    async fn delete_membership(
        &self,
        team_id: &TeamId,
        membership_id: &MembershipId,
    ) -> Result<(), StoreError> {
        let mut all = self.memberships.write().map_err(lock_err)?;
        let before = all.len();
        all.retain(|m| !(&m.id == membership_id && &m.team_id == team_id));
        if all.len() == before {
            return Err(StoreError::Api {
                status: 404,
                message: format!("membership {membership_id} not found"),
            });
        }
        Ok(())
    }
}
