use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query as UrlQuery, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use secrecy::Secret;
use serde_json::{json, Value as JsonValue};

use medstock_core::{MembershipId, TeamId};
use medstock_infra::config::{PageLimits, StoreSettings};
use medstock_infra::store::{fetch_all, DocumentStore, HttpBackend, Query, StoreError, TeamDirectory};

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<(HeaderMap, Vec<JsonValue>)>>>,
}

struct MockBackend {
    base_url: String,
    recorded: Recorded,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn parse_queries(params: &[(String, String)]) -> Vec<JsonValue> {
    params
        .iter()
        .filter(|(k, _)| k == "queries[]")
        .map(|(_, v)| serde_json::from_str(v).unwrap())
        .collect()
}

fn query_number(queries: &[JsonValue], method: &str) -> usize {
    queries
        .iter()
        .find(|q| q["method"] == method)
        .and_then(|q| q["values"][0].as_u64())
        .unwrap_or(0) as usize
}

/// 250 documents in `items`; `broken` always fails.
async fn list_documents(
    State(rec): State<Recorded>,
    Path((_db, collection)): Path<(String, String)>,
    headers: HeaderMap,
    UrlQuery(params): UrlQuery<Vec<(String, String)>>,
) -> axum::response::Response {
    let queries = parse_queries(&params);
    rec.requests.lock().unwrap().push((headers, queries.clone()));

    if collection == "broken" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "The current user is not authorized", "code": 401, "type": "user_unauthorized" })),
        )
            .into_response();
    }

    let limit = query_number(&queries, "limit");
    let offset = query_number(&queries, "offset");
    let docs: Vec<JsonValue> = (offset..(offset + limit).min(250))
        .map(|i| json!({ "$id": format!("doc{i}"), "n": i }))
        .collect();
    Json(json!({ "total": 250, "documents": docs })).into_response()
}

async fn get_team(Path(team): Path<String>) -> axum::response::Response {
    if team == "pharmacy" {
        Json(json!({ "$id": "pharmacy", "name": "Pharmacy", "total": 2 })).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Team with the requested ID could not be found.", "code": 404 })),
        )
            .into_response()
    }
}

async fn delete_membership(Path((_team, membership)): Path<(String, String)>) -> StatusCode {
    if membership == "m1" {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

impl MockBackend {
    async fn spawn() -> Self {
        let recorded = Recorded::default();
        let app = Router::new()
            .route(
                "/v1/databases/:db/collections/:collection/documents",
                get(list_documents),
            )
            .route("/v1/teams/:team", get(get_team))
            .route(
                "/v1/teams/:team/memberships/:membership",
                axum::routing::delete(delete_membership),
            )
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/v1"),
            recorded,
            handle,
        }
    }

    fn backend(&self) -> HttpBackend {
        HttpBackend::new(&StoreSettings {
            endpoint: format!("{}/", self.base_url),
            project_id: "proj-1".to_string(),
            api_key: Secret::new("key-1".to_string()),
        })
        .unwrap()
    }
}

#[tokio::test]
async fn list_sends_credentials_and_json_queries() {
    let mock = MockBackend::spawn().await;
    let backend = mock.backend();

    let page = backend
        .list_documents("main", "items", &[Query::equal("status", [true]), Query::limit(10), Query::offset(5)])
        .await
        .unwrap();

    assert_eq!(page.total, 250);
    assert_eq!(page.documents.len(), 10);
    assert_eq!(page.documents[0]["$id"], "doc5");

    let requests = mock.recorded.requests.lock().unwrap();
    let (headers, queries) = &requests[0];
    assert_eq!(headers["x-appwrite-project"], "proj-1");
    assert_eq!(headers["x-appwrite-key"], "key-1");
    assert_eq!(
        queries[0],
        json!({ "method": "equal", "attribute": "status", "values": [true] })
    );
    assert_eq!(queries.len(), 3);
}

#[tokio::test]
async fn fetch_all_over_http_takes_three_pages() {
    let mock = MockBackend::spawn().await;
    let backend = mock.backend();

    let docs: Vec<JsonValue> = fetch_all(&backend, "main", "items", &[], PageLimits::default())
        .await
        .unwrap();
    assert_eq!(docs.len(), 250);

    let offsets: Vec<usize> = mock
        .recorded
        .requests
        .lock()
        .unwrap()
        .iter()
        .map(|(_, q)| query_number(q, "offset"))
        .collect();
    assert_eq!(offsets, vec![0, 100, 200]);
}

#[tokio::test]
async fn error_responses_carry_backend_message() {
    let mock = MockBackend::spawn().await;
    let err = mock
        .backend()
        .list_documents("main", "broken", &[])
        .await
        .unwrap_err();

    match err {
        StoreError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "The current user is not authorized");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_team_is_none() {
    let mock = MockBackend::spawn().await;
    let backend = mock.backend();

    let team = backend.get_team(&TeamId::from_raw("pharmacy")).await.unwrap();
    assert_eq!(team.map(|t| t.name), Some("Pharmacy".to_string()));
    assert!(backend.get_team(&TeamId::from_raw("ghost")).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let mock = MockBackend::spawn().await;
    let backend = mock.backend();
    let team = TeamId::from_raw("pharmacy");

    backend
        .delete_membership(&team, &MembershipId::from_raw("m1"))
        .await
        .unwrap();
    let err = backend
        .delete_membership(&team, &MembershipId::from_raw("m2"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Api { status: 404, .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let backend = HttpBackend::new(&StoreSettings {
        endpoint: "http://127.0.0.1:1".to_string(),
        project_id: "p".to_string(),
        api_key: Secret::new("k".to_string()),
    })
    .unwrap();

    let err = backend.list_documents("main", "items", &[]).await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}
