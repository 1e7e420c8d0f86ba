#![allow(clippy::unwrap_used)]
// `ListStore` driven over HTTP against a wiremock table service.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelf_api::ResourceClient;
use shelf_core::{ListStore, Movie, Record, RecordId, Status, StoreConfig};

const MOVIES: &str = "/rest/v1/movies";

async fn setup() -> (MockServer, ListStore<Movie, ResourceClient<Record<Movie>>>) {
    let server = MockServer::start().await;
    let base = format!("{}/rest/v1", server.uri());
    let client = ResourceClient::from_reqwest(&base, "movies", reqwest::Client::new())
        .unwrap()
        .with_order("nombre");
    (server, ListStore::new(client))
}

fn row(id: i64, nombre: &str) -> serde_json::Value {
    json!({
        "id": id,
        "nombre": nombre,
        "url": format!("http://i/{id}.jpg"),
        "sinopsis": "s",
        "created_at": "2025-06-21T18:00:00+00:00"
    })
}

#[tokio::test]
async fn test_create_then_list_round_trip() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path(MOVIES))
        .and(query_param("order", "nombre.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, "Alien")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let initial = store.fetch_all().await.unwrap();
    assert_eq!(initial.len(), 1);

    Mock::given(method("POST"))
        .and(path(MOVIES))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({"nombre": "Matrix", "url": "http://i/m.jpg", "sinopsis": "hackers"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": 2, "nombre": "Matrix", "url": "http://i/m.jpg", "sinopsis": "hackers"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let input = Movie::new("Matrix", "http://i/m.jpg", "hackers");
    let created = store.create(&input).await.unwrap();
    assert_eq!(created.id, RecordId::Int(2));
    assert_eq!(store.items().len(), 2);
    assert_eq!(store.items()[1].fields, input);

    Mock::given(method("GET"))
        .and(path(MOVIES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row(1, "Alien"),
            {"id": 2, "nombre": "Matrix", "url": "http://i/m.jpg", "sinopsis": "hackers"}
        ])))
        .mount(&server)
        .await;

    let listed = store.fetch_all().await.unwrap();
    assert!(listed.iter().any(|r| r.id == created.id && r.fields == input));
    assert_eq!(store.status(), Status::Succeeded);
}

#[tokio::test]
async fn test_update_missing_id_keeps_items() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path(MOVIES))
        .and(query_param("order", "nombre.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, "Alien")])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(MOVIES))
        .and(query_param("id", "eq.99"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(MOVIES))
        .and(query_param("id", "eq.99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    store.fetch_all().await.unwrap();
    let before = store.items();

    let err = store
        .update(&RecordId::Int(99), &Movie::new("Z", "http://z", "z"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(store.items(), before);
    assert_eq!(store.status(), Status::Failed);
    assert_eq!(
        store.error().as_deref(),
        Some("failed to update record: No movies record with id 99")
    );
}

#[tokio::test]
async fn test_update_refetches_and_replaces() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path(MOVIES))
        .and(query_param("order", "nombre.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, "Alien"), row(2, "Brazil")])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(MOVIES))
        .and(query_param("id", "eq.2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(MOVIES))
        .and(query_param("id", "eq.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(2, "Brazil (1985)")])))
        .expect(1)
        .mount(&server)
        .await;

    store.fetch_all().await.unwrap();
    store
        .update(&RecordId::Int(2), &Movie::new("Brazil (1985)", "http://i/2.jpg", "s"))
        .await
        .unwrap();

    let names: Vec<_> = store.items().into_iter().map(|r| r.fields.nombre).collect();
    assert_eq!(names, vec!["Alien", "Brazil (1985)"]);
}

#[tokio::test]
async fn test_server_error_on_list_fails_store() {
    let (server, store) = setup().await;

    Mock::given(method("GET"))
        .and(path(MOVIES))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    store.fetch_all().await.unwrap_err();

    assert_eq!(store.status(), Status::Failed);
    assert!(store.items().is_empty());
    assert_eq!(
        store.error().as_deref(),
        Some("failed to load records: Server rejected the request (HTTP 503): upstream down")
    );
}

#[tokio::test]
async fn test_open_rest_config_sends_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(MOVIES))
        .and(query_param("id", "eq.1"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = StoreConfig::rest(
        format!("{}/rest/v1", server.uri()).parse().unwrap(),
        "anon-key".to_owned().into(),
    );
    let store: ListStore<Movie> = ListStore::open(&config).unwrap();

    store.delete(&RecordId::Int(1)).await.unwrap();
    assert_eq!(store.status(), Status::Succeeded);
}
