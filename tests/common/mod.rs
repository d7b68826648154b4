#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Once, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use records_api::{app, database::MemoryStore, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Router over a fresh in-memory store, driven without a socket.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

/// Cheapest bcrypt cost for test accounts. Must run before the config is first read.
const TEST_BCRYPT_COST: &str = "4";

fn init_test_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| std::env::set_var("SECURITY_BCRYPT_COST", TEST_BCRYPT_COST));
}

impl TestApp {
    pub fn new() -> Self {
        init_test_env();
        let state = AppState::new(Arc::new(MemoryStore::new()));
        Self { router: app(state) }
    }

    pub async fn raw(&self, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
        let response = self.raw(method, uri, body, token).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body), None).await
    }

    pub async fn delete(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(body), None).await
    }

    /// Create a user through the API, acting as `admin` via the body role.
    pub async fn create_user(&self, email: &str, password: &str, role: &str) -> Value {
        let (status, body) = self
            .post(
                "/users/create",
                json!({"email": email, "password": password, "userRole": role, "role": "admin"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"].clone()
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self.post("/users/login", json!({"email": email, "password": password})).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn create_group(&self, name: &str) -> i64 {
        let (status, body) = self.post("/groups/", json!({"name": name, "role": "manager"})).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }

    pub async fn create_teacher(&self, email: &str) -> Value {
        let (status, body) = self
            .post(
                "/teachers/create",
                json!({
                    "email": email,
                    "password": "secret",
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                    "role": "manager"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"].clone()
    }

    pub async fn create_student(&self, email: &str, group_id: i64) -> Value {
        let (status, body) = self
            .post(
                "/students/",
                json!({
                    "email": email,
                    "password": "secret",
                    "firstName": "Sam",
                    "lastName": "Doe",
                    "groupId": group_id
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"].clone()
    }

    pub async fn create_discipline(&self, name: &str, teacher_id: i64) -> i64 {
        let (status, body) = self
            .post("/disciplines/", json!({"name": name, "teacherId": teacher_id, "role": "manager"}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }
}

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// The built binary, started once per test process on the in-memory store.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_records-api"));
        cmd.env("RECORDS_API_PORT", port.to_string())
            .env("DATABASE_URL", "memory:")
            .env("APP_ENV", "development")
            .env("SECURITY_BCRYPT_COST", TEST_BCRYPT_COST)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
