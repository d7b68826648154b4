// handlers/grades.rs - /grades routes
//
// Write bodies wrap the grade fields in `data`: {"data": {...}, "role": "teacher"}

use axum::extract::{Path, State};
use serde::Deserialize;

use crate::database::models::{Grade, GradeChanges, NewGrade};
use crate::error::ApiError;
use crate::handlers::utils::{body_role, parse_id, RoleOnly, NO_DATA};
use crate::middleware::{ApiResponse, ApiResult, Caller, GatedBody, JsonBody};
use crate::state::AppState;
use crate::types::Role;

const GRADERS: &[Role] = &[Role::Teacher];

#[derive(Debug, Deserialize)]
pub struct CreateGradeRequest {
    pub data: Option<NewGrade>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGradeRequest {
    pub data: Option<GradeChanges>,
}

/// POST /grades/
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    body: GatedBody,
) -> ApiResult<Grade> {
    caller.authorize(body.role(), GRADERS)?;
    let body: CreateGradeRequest = body.into_payload()?;
    let grade = body.data.ok_or_else(|| ApiError::bad_request(NO_DATA))?;
    Ok(ApiResponse::created(state.grades.create(grade).await?))
}

/// GET /grades/
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Grade>> {
    Ok(ApiResponse::success(state.grades.get_all().await?))
}

/// GET /grades/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Grade> {
    let id = parse_id(&id)?;
    state
        .grades
        .get_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such grade"))
}

/// GET /grades/student/:studentId - students only
pub async fn list_by_student(
    State(state): State<AppState>,
    caller: Caller,
    Path(student_id): Path<String>,
    body: Option<JsonBody<RoleOnly>>,
) -> ApiResult<Vec<Grade>> {
    caller.authorize(body_role(&body), &[Role::Student])?;
    let student_id = parse_id(&student_id)?;
    Ok(ApiResponse::success(state.grades.get_by_student_id(student_id).await?))
}

/// GET /grades/teacher/:teacherId
pub async fn list_by_teacher(State(state): State<AppState>, Path(teacher_id): Path<String>) -> ApiResult<Vec<Grade>> {
    let teacher_id = parse_id(&teacher_id)?;
    Ok(ApiResponse::success(state.grades.get_by_teacher_id(teacher_id).await?))
}

/// PUT /grades/:id
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: GatedBody,
) -> ApiResult<Grade> {
    caller.authorize(body.role(), GRADERS)?;
    let id = parse_id(&id)?;
    let body: UpdateGradeRequest = body.into_payload()?;
    let changes = body
        .data
        .filter(|changes| !changes.is_empty())
        .ok_or_else(|| ApiError::bad_request(NO_DATA))?;

    state
        .grades
        .update(id, changes)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such grade"))
}

/// DELETE /grades/:id
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Option<JsonBody<RoleOnly>>,
) -> ApiResult<()> {
    caller.authorize(body_role(&body), GRADERS)?;
    let id = parse_id(&id)?;

    if !state.grades.delete(id).await? {
        return Err(ApiError::not_found("No such grade"));
    }
    Ok(ApiResponse::no_content())
}
