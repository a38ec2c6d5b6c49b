// Integration tests for `CollectionClient` using wiremock.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use staybook_api::{CollectionClient, DocumentStore, EqualityFilter, Error};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    title: String,
    user_id: String,
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(collection: &str) -> (MockServer, CollectionClient<Record>) {
    let server = MockServer::start().await;
    let store = DocumentStore::with_client(reqwest::Client::new(), server.uri().parse().unwrap());
    (server, store.collection(collection))
}

fn record(title: &str, user_id: &str) -> Record {
    Record {
        title: title.into(),
        user_id: user_id.into(),
    }
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_preserves_server_order() {
    let (server, client) = setup("offered-places").await;

    let body = r#"{
        "-Nz2": { "title": "Second", "userId": "u1" },
        "-Na1": { "title": "First", "userId": "u2" }
    }"#;

    Mock::given(method("GET"))
        .and(path("/offered-places.json"))
        .and(query_param("auth", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let rows = client.list("tok", None).await.unwrap();

    assert_eq!(
        rows,
        vec![
            ("-Nz2".to_owned(), record("Second", "u1")),
            ("-Na1".to_owned(), record("First", "u2")),
        ]
    );
}

#[tokio::test]
async fn test_list_null_body_is_empty() {
    let (server, client) = setup("my-bookings").await;

    Mock::given(method("GET"))
        .and(path("/my-bookings.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let rows = client.list("tok", None).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_list_sends_equality_filter() {
    let (server, client) = setup("my-bookings").await;

    Mock::given(method("GET"))
        .and(path("/my-bookings.json"))
        .and(query_param("orderBy", "\"userId\""))
        .and(query_param("equalTo", "\"u1\""))
        .and(query_param("auth", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "-Nb1": { "title": "Mine", "userId": "u1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = EqualityFilter::new("userId", "u1");
    let rows = client.list("tok", Some(&filter)).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "-Nb1");
}

#[tokio::test]
async fn test_get_returns_none_for_null() {
    let (server, client) = setup("offered-places").await;

    Mock::given(method("GET"))
        .and(path("/offered-places/-Nmissing.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    assert_eq!(client.get("tok", "-Nmissing").await.unwrap(), None);
}

#[tokio::test]
async fn test_get_returns_record() {
    let (server, client) = setup("offered-places").await;

    Mock::given(method("GET"))
        .and(path("/offered-places/-Np1.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "title": "Loft", "userId": "u9" })),
        )
        .mount(&server)
        .await;

    assert_eq!(client.get("tok", "-Np1").await.unwrap(), Some(record("Loft", "u9")));
}

#[tokio::test]
async fn test_create_sends_body_and_returns_assigned_id() {
    let (server, client) = setup("offered-places").await;

    Mock::given(method("POST"))
        .and(path("/offered-places.json"))
        .and(query_param("auth", "tok"))
        .and(body_json(json!({ "title": "Loft", "userId": "u1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "-Nnew" })))
        .expect(1)
        .mount(&server)
        .await;

    let id = client.create("tok", &record("Loft", "u1")).await.unwrap();
    assert_eq!(id, "-Nnew");
}

#[tokio::test]
async fn test_replace_puts_full_record() {
    let (server, client) = setup("offered-places").await;

    Mock::given(method("PUT"))
        .and(path("/offered-places/-Np1.json"))
        .and(body_json(json!({ "title": "Renamed", "userId": "u1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "title": "Renamed", "userId": "u1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.replace("tok", "-Np1", &record("Renamed", "u1")).await.unwrap();
}

#[tokio::test]
async fn test_delete_document() {
    let (server, client) = setup("my-bookings").await;

    Mock::given(method("DELETE"))
        .and(path("/my-bookings/-Nb1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    client.delete("tok", "-Nb1").await.unwrap();
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_http_error() {
    let (server, client) = setup("offered-places").await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Permission denied" })),
        )
        .mount(&server)
        .await;

    let err = client.list("bad", None).await.unwrap_err();
    assert!(err.is_auth_rejected());
    assert!(matches!(err, Error::Http { status: 401, .. }));
}

#[tokio::test]
async fn test_malformed_create_response_is_deserialization_error() {
    let (server, client) = setup("offered-places").await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let err = client.create("tok", &record("Loft", "u1")).await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert!(body.contains("unexpected")),
        other => panic!("expected deserialization error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_on_replace() {
    let (server, client) = setup("offered-places").await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.replace("tok", "-Np1", &record("x", "u1")).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.is_transient());
}
