mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn root_describes_service() {
    let app = TestApp::new();
    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["backend"], "memory");
    assert!(body["data"]["endpoints"]["grades"].is_string());
}

#[tokio::test]
async fn health_reports_store() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "ok");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new();
    let response = app.raw(Method::GET, "/health", None, None).await;
    let id = response.headers().get("x-request-id").and_then(|v| v.to_str().ok());
    assert!(id.is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new();
    let response = app
        .raw(
            Method::POST,
            "/users/login",
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = app.post("/users/login", json!({"email": 5})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let app = TestApp::new();
    let (status, _) = app.get("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
