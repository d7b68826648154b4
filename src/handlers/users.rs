// handlers/users.rs - /users routes: login and account management

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::utils::{body_role, parse_id, RoleOnly, NO_DATA};
use crate::middleware::{ApiResponse, ApiResult, Caller, GatedBody, JsonBody};
use crate::services::{LoginOutcome, UserPatch};
use crate::state::AppState;
use crate::types::Role;

const USER_ADMINS: &[Role] = &[Role::Admin, Role::Manager];

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    /// Role of the new account; defaults to the caller's role.
    pub user_role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub user_role: Option<String>,
}

fn parse_user_role(raw: Option<&str>) -> Result<Option<Role>, ApiError> {
    raw.map(|r| r.parse::<Role>().map_err(|_| ApiError::bad_request("Incorrect data passed")))
        .transpose()
}

/// POST /users/login
pub async fn login(State(state): State<AppState>, JsonBody(body): JsonBody<LoginRequest>) -> ApiResult<LoginResponse> {
    match state.users.login(&body.email, &body.password).await? {
        LoginOutcome::UnknownEmail => Err(ApiError::not_found("No user found")),
        LoginOutcome::WrongPassword => Err(ApiError::bad_request("Wrong password")),
        LoginOutcome::Authenticated(user) => {
            let issued = auth::generate_jwt(&user)?;
            tracing::info!("User {} logged in", user.id);
            Ok(ApiResponse::success(LoginResponse {
                user,
                token: issued.token,
                expires_in: issued.expires_in,
            }))
        }
    }
}

/// GET /users/all
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    Ok(ApiResponse::success(state.users.get_all().await?))
}

/// GET /users/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    let id = parse_id(&id)?;
    state
        .users
        .get_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such user"))
}

/// POST /users/create
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    body: GatedBody,
) -> ApiResult<User> {
    let caller_role = caller.authorize(body.role(), USER_ADMINS)?;
    let body: CreateUserRequest = body.into_payload()?;
    let role = parse_user_role(body.user_role.as_deref())?.unwrap_or(caller_role);

    let user = state.users.create(&body.email, &body.password, role).await?;
    Ok(ApiResponse::created(user))
}

/// PUT /users/:id
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: GatedBody,
) -> ApiResult<User> {
    caller.authorize(body.role(), USER_ADMINS)?;
    let id = parse_id(&id)?;
    let body: UpdateUserRequest = body.into_payload()?;

    let patch = UserPatch {
        role: parse_user_role(body.user_role.as_deref())?,
        email: body.email,
        password: body.password,
    };
    if patch.is_empty() {
        return Err(ApiError::bad_request(NO_DATA));
    }

    state
        .users
        .update(id, patch)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such user"))
}

/// DELETE /users/:id
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Option<JsonBody<RoleOnly>>,
) -> ApiResult<()> {
    caller.authorize(body_role(&body), USER_ADMINS)?;
    let id = parse_id(&id)?;

    if !state.users.delete(id).await? {
        return Err(ApiError::not_found("No such user"));
    }
    Ok(ApiResponse::no_content())
}
