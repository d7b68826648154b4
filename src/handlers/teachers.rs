// handlers/teachers.rs - /teachers routes

use axum::extract::{Path, State};

use crate::database::models::{Teacher, TeacherChanges};
use crate::error::ApiError;
use crate::handlers::utils::{body_role, parse_id, RoleOnly, NO_DATA};
use crate::middleware::{ApiResponse, ApiResult, Caller, GatedBody, JsonBody};
use crate::services::NewTeacherAccount;
use crate::state::AppState;
use crate::types::Role;

const TEACHER_ADMINS: &[Role] = &[Role::Manager];

/// POST /teachers/create
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    body: GatedBody,
) -> ApiResult<Teacher> {
    caller.authorize(body.role(), TEACHER_ADMINS)?;
    let account: NewTeacherAccount = body.into_payload()?;
    Ok(ApiResponse::created(state.teachers.create(account).await?))
}

/// GET /teachers/all
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Teacher>> {
    Ok(ApiResponse::success(state.teachers.get_all().await?))
}

/// GET /teachers/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Teacher> {
    let id = parse_id(&id)?;
    state
        .teachers
        .get_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such teacher"))
}

/// GET /teachers/user/:userId
pub async fn get_by_user(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult<Teacher> {
    let user_id = parse_id(&user_id)?;
    state
        .teachers
        .get_by_user_id(user_id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such teacher"))
}

/// PUT /teachers/:id
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: GatedBody,
) -> ApiResult<Teacher> {
    caller.authorize(body.role(), TEACHER_ADMINS)?;
    let id = parse_id(&id)?;
    let changes: TeacherChanges = body.into_payload()?;
    if changes.is_empty() {
        return Err(ApiError::bad_request(NO_DATA));
    }

    state
        .teachers
        .update(id, changes)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such teacher"))
}

/// DELETE /teachers/:id
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Option<JsonBody<RoleOnly>>,
) -> ApiResult<()> {
    caller.authorize(body_role(&body), TEACHER_ADMINS)?;
    let id = parse_id(&id)?;

    if !state.teachers.delete(id).await? {
        return Err(ApiError::not_found("No such teacher"));
    }
    Ok(ApiResponse::no_content())
}
