#![allow(clippy::unwrap_used)]
// Integration tests for `ResourceClient` using wiremock.

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelf_api::{Error, ResourceClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct MovieRow {
    id: String,
    nombre: String,
    url: String,
    sinopsis: String,
}

#[derive(Serialize)]
struct MovieBody<'a> {
    nombre: &'a str,
    url: &'a str,
    sinopsis: &'a str,
}

const MOVIES: &str = "/rest/v1/movies";

async fn setup() -> (MockServer, ResourceClient<MovieRow>) {
    let server = MockServer::start().await;
    let base = format!("{}/rest/v1", server.uri());
    let client = ResourceClient::from_reqwest(&base, "movies", reqwest::Client::new())
        .unwrap()
        .with_order("nombre");
    (server, client)
}

fn matrix() -> serde_json::Value {
    json!({
        "id": "6a1f0c1e-0000-4000-8000-000000000001",
        "nombre": "Matrix",
        "url": "http://i/m.jpg",
        "sinopsis": "hackers",
        "created_at": "2025-06-21T18:00:00+00:00"
    })
}

// ── list ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_orders_by_field() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(MOVIES))
        .and(query_param("order", "nombre.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([matrix()])))
        .mount(&server)
        .await;

    let rows = client.list().await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].nombre, "Matrix");
    assert_eq!(rows[0].sinopsis, "hackers");
}

#[tokio::test]
async fn test_list_empty_table() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(MOVIES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_non_success_carries_status_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(MOVIES))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(r#"{"message":"relation \"public.movies\" does not exist"}"#),
        )
        .mount(&server)
        .await;

    match client.list().await {
        Err(Error::Status { status, ref body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("does not exist"), "unexpected body: {body}");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_invalid_json_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(MOVIES))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let result = client.list().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── auth headers ────────────────────────────────────────────────────

#[tokio::test]
async fn test_api_key_headers_are_sent() {
    let server = MockServer::start().await;
    let key = secrecy::SecretString::from("anon-key".to_string());
    let client: ResourceClient<MovieRow> = ResourceClient::from_api_key(
        &format!("{}/rest/v1", server.uri()),
        "movies",
        &key,
        &TransportConfig::default(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path(MOVIES))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.list().await.unwrap();
}

// ── create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_unwraps_singleton_array() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(MOVIES))
        .and(header("prefer", "return=representation"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "nombre": "Matrix",
            "url": "http://i/m.jpg",
            "sinopsis": "hackers"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([matrix()])))
        .mount(&server)
        .await;

    let created = client
        .create(&MovieBody {
            nombre: "Matrix",
            url: "http://i/m.jpg",
            sinopsis: "hackers",
        })
        .await
        .unwrap();

    assert_eq!(created.id, "6a1f0c1e-0000-4000-8000-000000000001");
    assert_eq!(created.nombre, "Matrix");
}

#[tokio::test]
async fn test_create_accepts_bare_object() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(MOVIES))
        .respond_with(ResponseTemplate::new(201).set_body_json(matrix()))
        .mount(&server)
        .await;

    let created = client
        .create(&MovieBody {
            nombre: "Matrix",
            url: "http://i/m.jpg",
            sinopsis: "hackers",
        })
        .await
        .unwrap();

    assert_eq!(created.url, "http://i/m.jpg");
}

#[tokio::test]
async fn test_create_without_representation() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(MOVIES))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let result = client
        .create(&MovieBody {
            nombre: "Matrix",
            url: "http://i/m.jpg",
            sinopsis: "hackers",
        })
        .await;

    assert!(
        matches!(
            result,
            Err(Error::MissingRepresentation {
                operation: "create"
            })
        ),
        "expected MissingRepresentation, got: {result:?}"
    );
}

#[tokio::test]
async fn test_create_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(MOVIES))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let err = client
        .create(&MovieBody {
            nombre: "Matrix",
            url: "http://i/m.jpg",
            sinopsis: "hackers",
        })
        .await
        .unwrap_err();

    assert!(err.is_auth());
    assert_eq!(err.to_string(), "HTTP 401: Invalid API key");
}

// ── update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_refetches_when_patch_is_empty() {
    let (server, client) = setup().await;
    let id = "6a1f0c1e-0000-4000-8000-000000000001";

    Mock::given(method("PATCH"))
        .and(path(MOVIES))
        .and(query_param("id", format!("eq.{id}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut updated = matrix();
    updated["sinopsis"] = json!("red pill");
    Mock::given(method("GET"))
        .and(path(MOVIES))
        .and(query_param("id", format!("eq.{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([updated])))
        .expect(1)
        .mount(&server)
        .await;

    let row = client
        .update(
            id,
            &MovieBody {
                nombre: "Matrix",
                url: "http://i/m.jpg",
                sinopsis: "red pill",
            },
        )
        .await
        .unwrap();

    assert_eq!(row.sinopsis, "red pill");
}

#[tokio::test]
async fn test_update_skips_refetch_when_row_is_echoed() {
    let (server, client) = setup().await;
    let client = client.with_return_representation(true);
    let id = "6a1f0c1e-0000-4000-8000-000000000001";

    Mock::given(method("PATCH"))
        .and(path(MOVIES))
        .and(query_param("id", format!("eq.{id}")))
        .and(header("prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([matrix()])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let row = client
        .update(
            id,
            &MovieBody {
                nombre: "Matrix",
                url: "http://i/m.jpg",
                sinopsis: "hackers",
            },
        )
        .await
        .unwrap();

    assert_eq!(row.nombre, "Matrix");
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path(MOVIES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(MOVIES))
        .and(query_param("id", "eq.404"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = client
        .update(
            "404",
            &MovieBody {
                nombre: "Ghost",
                url: "http://i/g.jpg",
                sinopsis: "nothing",
            },
        )
        .await;

    match result {
        Err(ref err @ Error::NotFound { ref resource, ref id }) => {
            assert_eq!(resource, "movies");
            assert_eq!(id, "404");
            assert!(err.is_not_found());
        }
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

// ── get / delete ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_by_id_empty_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(MOVIES))
        .and(query_param("id", "eq.9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = client.get_by_id("9").await;
    assert!(
        matches!(result, Err(Error::NotFound { .. })),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_delete_scoped_to_id() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(MOVIES))
        .and(query_param("id", "eq.3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete("3").await.unwrap();
}

#[tokio::test]
async fn test_delete_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(MOVIES))
        .respond_with(ResponseTemplate::new(409).set_body_string("foreign key violation"))
        .mount(&server)
        .await;

    match client.delete("3").await {
        Err(Error::Status { status: 409, ref body }) => {
            assert_eq!(body, "foreign key violation");
        }
        other => panic!("expected Status 409, got: {other:?}"),
    }
}
