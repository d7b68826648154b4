mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn login_returns_token_and_hides_hash() {
    let app = TestApp::new();
    app.create_user("admin@example.com", "secret", "admin").await;

    let (status, body) = app
        .post("/users/login", json!({"email": "admin@example.com", "password": "secret"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["data"]["expiresIn"].as_i64().is_some_and(|s| s > 0));
    assert_eq!(body["data"]["user"]["role"], "admin");
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn login_failures() {
    let app = TestApp::new();
    app.create_user("a@example.com", "secret", "guest").await;

    let (status, body) = app
        .post("/users/login", json!({"email": "nobody@example.com", "password": "secret"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No user found");

    let (status, body) = app
        .post("/users/login", json!({"email": "a@example.com", "password": "wrong"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Wrong password");
}

#[tokio::test]
async fn token_role_authorizes_without_body_role() {
    let app = TestApp::new();
    app.create_user("m@example.com", "secret", "manager").await;
    let token = app.login("m@example.com", "secret").await;

    let (status, body) = app
        .send(Method::POST, "/groups/", Some(json!({"name": "CS-1"})), Some(&token))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
}

#[tokio::test]
async fn token_role_overrides_body_role() {
    let app = TestApp::new();
    app.create_user("g@example.com", "secret", "guest").await;
    let token = app.login("g@example.com", "secret").await;

    let (status, body) = app
        .send(Method::POST, "/groups/", Some(json!({"name": "CS-1", "role": "manager"})), Some(&token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");
}

#[tokio::test]
async fn bad_tokens_are_unauthorized() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::POST, "/groups/", Some(json!({"name": "CS-1", "role": "manager"})), Some("garbage"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn unknown_or_miscased_roles_never_authorize() {
    let app = TestApp::new();
    for role in ["Manager", "root", ""] {
        let (status, _) = app.post("/groups/", json!({"name": "CS-1", "role": role})).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "role {:?}", role);
    }
    let (status, _) = app.post("/groups/", json!({"name": "CS-1"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn forbidden_callers_are_rejected_before_payload_checks() {
    let app = TestApp::new();
    let requests = [
        ("/users/create", json!({"role": "student"})),
        ("/teachers/create", json!({"role": "student", "email": "t@example.com"})),
        ("/disciplines/", json!({"role": "student", "name": "Math"})),
        ("/grades/", json!({"role": "student", "data": {"value": 5}})),
        ("/groups/", json!({"role": "student", "name": 5})),
        ("/groups/link", json!({"role": "student", "groupId": "one"})),
    ];
    for (uri, body) in requests {
        let (status, resp) = app.post(uri, body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", uri, resp);
        assert_eq!(resp["message"], "Access denied");
    }

    for uri in ["/users/1", "/teachers/1", "/students/1", "/disciplines/1", "/grades/1", "/groups/1"] {
        let (status, resp) = app.put(uri, json!({"role": "guest", "firstName": 7})).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", uri, resp);
    }
}

#[tokio::test]
async fn allowed_callers_with_incomplete_payloads_get_bad_request() {
    let app = TestApp::new();
    let requests = [
        ("/users/create", json!({"role": "admin"})),
        ("/teachers/create", json!({"role": "manager", "email": "t@example.com"})),
        ("/disciplines/", json!({"role": "manager", "name": "Math"})),
        ("/grades/", json!({"role": "teacher", "data": {"value": 5}})),
    ];
    for (uri, body) in requests {
        let (status, resp) = app.post(uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", uri, resp);
        assert_eq!(resp["message"], "Incorrect data passed");
    }
}
