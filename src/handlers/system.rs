// handlers/system.rs - GET / and GET /health

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Records API",
            "version": version,
            "description": "Role-gated management of users, teachers, students, groups, disciplines and grades",
            "backend": state.store.backend(),
            "endpoints": {
                "users": "/users/login, /users/all, /users/create, /users/:id",
                "teachers": "/teachers/create, /teachers/all, /teachers/:id, /teachers/user/:userId",
                "students": "/students/, /students/:id, /students/user/:userId, /students/group/:groupId",
                "groups": "/groups/, /groups/:id, /groups/link, /groups/links, /groups/disciplines/:groupId",
                "disciplines": "/disciplines/, /disciplines/:id, /disciplines/teacher/:teacherId",
                "grades": "/grades/, /grades/:id, /grades/student/:studentId, /grades/teacher/:teacherId",
                "health": "/health",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok",
                    "backend": state.store.backend()
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable",
                        "backend": state.store.backend()
                    }
                })),
            )
        }
    }
}
