use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Request},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{self, SecurityConfig};
use crate::handlers::{disciplines, grades, groups, students, system, teachers, users};
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let config = config::config();

    let mut router = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(user_routes())
        .merge(teacher_routes())
        .merge(student_routes())
        .merge(group_routes())
        .merge(discipline_routes())
        .merge(grade_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        }));
    }

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }

    // Outermost, so the trace span above can see the id
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if crate::is_development!() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/login", post(users::login))
        .route("/users/all", get(users::list))
        .route("/users/create", post(users::create))
        .route("/users/:id", get(users::get).put(users::update).delete(users::delete))
}

fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/teachers/create", post(teachers::create))
        .route("/teachers/all", get(teachers::list))
        .route("/teachers/user/:user_id", get(teachers::get_by_user))
        .route(
            "/teachers/:id",
            get(teachers::get).put(teachers::update).delete(teachers::delete),
        )
}

fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/students/", post(students::create).get(students::list))
        .route("/students/user/:user_id", get(students::get_by_user))
        .route("/students/group/:group_id", get(students::list_by_group))
        .route(
            "/students/:id",
            get(students::get).put(students::update).delete(students::delete),
        )
}

fn group_routes() -> Router<AppState> {
    Router::new()
        .route("/groups/", post(groups::create).get(groups::list))
        .route("/groups/link", post(groups::link))
        .route("/groups/links", get(groups::list_links))
        .route("/groups/disciplines/:group_id", get(groups::list_disciplines))
        .route("/groups/:id", get(groups::get).put(groups::update).delete(groups::delete))
}

fn discipline_routes() -> Router<AppState> {
    Router::new()
        .route("/disciplines/", post(disciplines::create).get(disciplines::list))
        .route("/disciplines/teacher/:teacher_id", get(disciplines::list_by_teacher))
        .route(
            "/disciplines/:id",
            get(disciplines::get).put(disciplines::update).delete(disciplines::delete),
        )
}

fn grade_routes() -> Router<AppState> {
    Router::new()
        .route("/grades/", post(grades::create).get(grades::list))
        .route("/grades/student/:student_id", get(grades::list_by_student))
        .route("/grades/teacher/:teacher_id", get(grades::list_by_teacher))
        .route("/grades/:id", get(grades::get).put(grades::update).delete(grades::delete))
}
