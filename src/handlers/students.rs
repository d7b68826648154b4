// handlers/students.rs - /students routes

use axum::extract::{Path, State};

use crate::database::models::{Student, StudentChanges};
use crate::error::ApiError;
use crate::handlers::utils::{body_role, parse_id, RoleOnly, NO_DATA};
use crate::middleware::{ApiResponse, ApiResult, Caller, GatedBody, JsonBody};
use crate::services::NewStudentAccount;
use crate::state::AppState;
use crate::types::Role;

const STUDENT_ADMINS: &[Role] = &[Role::Admin, Role::Manager];

/// POST /students/ - open enrollment, no role gate
pub async fn create(State(state): State<AppState>, JsonBody(account): JsonBody<NewStudentAccount>) -> ApiResult<Student> {
    Ok(ApiResponse::created(state.students.create(account).await?))
}

/// GET /students/
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Student>> {
    Ok(ApiResponse::success(state.students.get_all().await?))
}

/// GET /students/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Student> {
    let id = parse_id(&id)?;
    state
        .students
        .get_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such student"))
}

/// GET /students/user/:userId
pub async fn get_by_user(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult<Student> {
    let user_id = parse_id(&user_id)?;
    state
        .students
        .get_by_user_id(user_id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such student"))
}

/// GET /students/group/:groupId
pub async fn list_by_group(State(state): State<AppState>, Path(group_id): Path<String>) -> ApiResult<Vec<Student>> {
    let group_id = parse_id(&group_id)?;
    let students = state.students.get_by_group_id(group_id).await?;
    if students.is_empty() {
        return Err(ApiError::not_found("No such students"));
    }
    Ok(ApiResponse::success(students))
}

/// PUT /students/:id
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: GatedBody,
) -> ApiResult<Student> {
    caller.authorize(body.role(), STUDENT_ADMINS)?;
    let id = parse_id(&id)?;
    let changes: StudentChanges = body.into_payload()?;
    if changes.is_empty() {
        return Err(ApiError::bad_request(NO_DATA));
    }

    state
        .students
        .update(id, changes)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such student"))
}

/// DELETE /students/:id
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Option<JsonBody<RoleOnly>>,
) -> ApiResult<()> {
    caller.authorize(body_role(&body), STUDENT_ADMINS)?;
    let id = parse_id(&id)?;

    if !state.students.delete(id).await? {
        return Err(ApiError::not_found("No such student"));
    }
    Ok(ApiResponse::no_content())
}
