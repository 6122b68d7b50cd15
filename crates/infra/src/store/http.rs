//! REST client for the hosted backend.
//!
//! Every request carries the project id and the server API key as headers.
//! Non-success responses are turned into [`StoreError::Api`] with the
//! backend's own error message when the body has one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use medstock_core::{MembershipId, TeamId, UserId};
use medstock_teams::{Membership, NewMembership, Team};

use crate::config::StoreSettings;

use super::{DocumentPage, DocumentStore, Query, StoreError, TeamDirectory};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct MembershipList {
    #[serde(default)]
    memberships: Vec<Membership>,
}

/// Document store + team directory over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: String,
    project_id: String,
    api_key: Secret<String>,
}

impl HttpBackend {
    pub fn new(settings: &StoreSettings) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("medstock/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            project_id: settings.project_id.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.endpoint, path))
            .header(PROJECT_HEADER, &self.project_id)
            .header(KEY_HEADER, self.api_key.expose_secret())
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, StoreError> {
        req.send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))
    }

    async fn error_from(resp: Response) -> StoreError {
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.message)
            .unwrap_or(text);
        StoreError::Api { status, message }
    }

    async fn json<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T, StoreError> {
        let resp = self.send(req).await?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        resp.json::<T>()
            .await
            .map_err(|e| StoreError::decode(what, e))
    }
}

fn query_params(queries: &[Query]) -> Vec<(&'static str, String)> {
    queries.iter().map(|q| ("queries[]", q.to_json())).collect()
}

#[async_trait]
impl DocumentStore for HttpBackend {
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentPage, StoreError> {
        let path = format!("/databases/{database_id}/collections/{collection_id}/documents");
        let req = self.request(Method::GET, &path).query(&query_params(queries));
        self.json(req, &format!("{collection_id} document list")).await
    }
}

#[async_trait]
impl TeamDirectory for HttpBackend {
    async fn get_team(&self, team_id: &TeamId) -> Result<Option<Team>, StoreError> {
        let resp = self.send(self.request(Method::GET, &format!("/teams/{team_id}"))).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        resp.json::<Team>()
            .await
            .map(Some)
            .map_err(|e| StoreError::decode("team", e))
    }

    async fn list_memberships(
        &self,
        team_id: &TeamId,
        queries: &[Query],
    ) -> Result<Vec<Membership>, StoreError> {
        let req = self
            .request(Method::GET, &format!("/teams/{team_id}/memberships"))
            .query(&query_params(queries));
        let list: MembershipList = self.json(req, "team membership list").await?;
        Ok(list.memberships)
    }

    async fn create_membership(
        &self,
        team_id: &TeamId,
        membership: &NewMembership,
    ) -> Result<Membership, StoreError> {
        let req = self
            .request(Method::POST, &format!("/teams/{team_id}/memberships"))
            .json(membership);
        self.json(req, "created membership").await
    }

    async fn update_membership_roles(
        &self,
        team_id: &TeamId,
        membership_id: &MembershipId,
        roles: &[String],
    ) -> Result<Membership, StoreError> {
        let req = self
            .request(
                Method::PATCH,
                &format!("/teams/{team_id}/memberships/{membership_id}"),
            )
            .json(&json!({ "roles": roles }));
        self.json(req, "updated membership").await
    }

    async fn list_user_memberships(&self, user_id: &UserId) -> Result<Vec<Membership>, StoreError> {
        let req = self.request(Method::GET, &format!("/users/{user_id}/memberships"));
        let list: MembershipList = self.json(req, "user membership list").await?;
        Ok(list.memberships)
    }

    async fn delete_membership(
        &self,
        team_id: &TeamId,
        membership_id: &MembershipId,
    ) -> Result<(), StoreError> {
        let req = self.request(
            Method::DELETE,
            &format!("/teams/{team_id}/memberships/{membership_id}"),
        );
        let resp = self.send(req).await?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        Ok(())
    }
}
