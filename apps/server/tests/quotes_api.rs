use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use quotes_server::{
    api::{app_router, with_middleware},
    build_state,
    config::Config,
};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

fn test_config(tmp: &TempDir) -> Config {
    let db_path = tmp.path().join("test.db").to_string_lossy().to_string();
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some(db_path.clone()),
        _ => None,
    })
    .unwrap()
}

fn test_config_with_timeout(tmp: &TempDir, timeout_ms: &str) -> Config {
    let db_path = tmp.path().join("test.db").to_string_lossy().to_string();
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some(db_path.clone()),
        "QUOTES_REQUEST_TIMEOUT_MS" => Some(timeout_ms.to_string()),
        _ => None,
    })
    .unwrap()
}

async fn build_test_router() -> (TempDir, Router) {
    let tmp = tempdir().unwrap();
    let config = test_config(&tmp);
    let state = build_state(&config).await.unwrap();
    (tmp, app_router(state, &config))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create(app: &Router, author: &str, quote: &str) -> Value {
    let response = send(
        app,
        Method::POST,
        "/quotes",
        Some(json!({ "author": author, "quote": quote })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["data"].clone()
}

#[tokio::test]
async fn create_trims_and_returns_the_stored_quote() {
    let (_tmp, app) = build_test_router().await;

    let created = create(&app, "  A  ", "  Q  ").await;

    assert_eq!(created["author"], "A");
    assert_eq!(created["quote"], "Q");
    assert!(created["id"].as_i64().unwrap() > 0);
    assert_eq!(created["created_at"], created["updated_at"]);
}

#[tokio::test]
async fn create_rejects_invalid_input() {
    let (_tmp, app) = build_test_router().await;

    let response = send(
        &app,
        Method::POST,
        "/quotes",
        Some(json!({ "author": "   ", "quote": "Q" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body, json!({ "error": "invalid quote data: author is required" }));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/quotes")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid JSON format");
}

#[tokio::test]
async fn list_filters_by_author_and_reports_total() {
    let (_tmp, app) = build_test_router().await;
    create(&app, "Confucius", "Life is really simple").await;
    create(&app, "Confucius", "It does not matter how slowly you go").await;
    create(&app, "Seneca", "Luck is what happens").await;

    let response = send(&app, Method::GET, "/quotes?author=Conf&limit=1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-total-count"], "2");

    let quotes = json_body(response).await["data"].as_array().unwrap().clone();
    assert_eq!(quotes.len(), 1);
    assert!(quotes[0]["author"].as_str().unwrap().contains("Conf"));
}

#[tokio::test]
async fn list_ignores_unusable_paging_values() {
    let (_tmp, app) = build_test_router().await;
    create(&app, "Ada", "one").await;
    create(&app, "Ada", "two").await;

    let response = send(&app, Method::GET, "/quotes?limit=abc&offset=-4", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let quotes = json_body(response).await["data"].as_array().unwrap().clone();
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0]["quote"], "two");
}

#[tokio::test]
async fn random_quote_is_404_until_something_is_stored() {
    let (_tmp, app) = build_test_router().await;

    let response = send(&app, Method::GET, "/quotes/random", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "No quotes found" }));

    let created = create(&app, "Ada", "Hello").await;
    let response = send(&app, Method::GET, "/quotes/random", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["id"], created["id"]);
}

#[tokio::test]
async fn get_by_id_returns_the_quote() {
    let (_tmp, app) = build_test_router().await;
    let created = create(&app, "Confucius", "Life is really simple").await;
    let uri = format!("/quotes/{}", created["id"]);

    let response = send(&app, Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"], created);

    let response = send(&app, Method::GET, "/quotes/9999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_a_quote_once() {
    let (_tmp, app) = build_test_router().await;
    let created = create(&app, "Ada", "Hello").await;
    let uri = format!("/quotes/{}", created["id"]);

    let response = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "data": { "message": "Quote deleted successfully" } })
    );

    let response = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "Quote not found" }));
}

#[tokio::test]
async fn delete_rejects_malformed_ids() {
    let (_tmp, app) = build_test_router().await;

    for uri in ["/quotes/abc", "/quotes/-1", "/quotes/0"] {
        let response = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert!(json_body(response).await["error"].is_string());
    }
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let (_tmp, app) = build_test_router().await;

    let response = send(&app, Method::GET, "/quotes", None).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (_tmp, app) = build_test_router().await;

    let response = send(&app, Method::GET, "/openapi.json", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert!(doc["paths"]["/quotes"].is_object());
}

async fn boom() -> &'static str {
    panic!("handler exploded")
}

#[tokio::test]
async fn panics_become_500_and_the_router_keeps_serving() {
    let tmp = tempdir().unwrap();
    let config = test_config(&tmp);
    let app = with_middleware(
        Router::new()
            .route("/boom", get(boom))
            .route("/ok", get(|| async { "ok" })),
        &config,
    );

    let response = send(&app, Method::GET, "/boom", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await, json!({ "error": "Internal server error" }));

    let response = send(&app, Method::GET, "/ok", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(2)).await;
    "late"
}

#[tokio::test]
async fn timed_out_requests_become_500_envelopes() {
    let tmp = tempdir().unwrap();
    let config = test_config_with_timeout(&tmp, "100");
    let app = with_middleware(
        Router::new()
            .route("/slow", get(slow))
            .route("/ok", get(|| async { "ok" })),
        &config,
    );

    let response = send(&app, Method::GET, "/slow", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(json_body(response).await, json!({ "error": "Internal server error" }));

    let response = send(&app, Method::GET, "/ok", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
