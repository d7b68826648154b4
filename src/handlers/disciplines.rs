// handlers/disciplines.rs - /disciplines routes

use axum::extract::{Path, State};
use serde::Deserialize;

use crate::database::models::{Discipline, DisciplineChanges};
use crate::error::ApiError;
use crate::handlers::utils::{body_role, parse_id, RoleOnly, NO_DATA};
use crate::middleware::{ApiResponse, ApiResult, Caller, GatedBody, JsonBody};
use crate::state::AppState;
use crate::types::Role;

const CREATORS: &[Role] = &[Role::Manager, Role::Admin];
const EDITORS: &[Role] = &[Role::Manager];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDisciplineRequest {
    pub name: String,
    pub teacher_id: i32,
}

/// POST /disciplines/
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    body: GatedBody,
) -> ApiResult<Discipline> {
    caller.authorize(body.role(), CREATORS)?;
    let body: CreateDisciplineRequest = body.into_payload()?;
    let discipline = state.disciplines.create(&body.name, body.teacher_id).await?;
    Ok(ApiResponse::created(discipline))
}

/// GET /disciplines/
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Discipline>> {
    Ok(ApiResponse::success(state.disciplines.get_all().await?))
}

/// GET /disciplines/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Discipline> {
    let id = parse_id(&id)?;
    state
        .disciplines
        .get_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such discipline"))
}

/// GET /disciplines/teacher/:teacherId
pub async fn list_by_teacher(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
) -> ApiResult<Vec<Discipline>> {
    let teacher_id = parse_id(&teacher_id)?;
    state
        .disciplines
        .get_by_teacher_id(teacher_id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No disciplines found for teacher"))
}

/// PUT /disciplines/:id
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: GatedBody,
) -> ApiResult<Discipline> {
    caller.authorize(body.role(), EDITORS)?;
    let id = parse_id(&id)?;
    let changes: DisciplineChanges = body.into_payload()?;
    if changes.is_empty() {
        return Err(ApiError::bad_request(NO_DATA));
    }

    state
        .disciplines
        .update(id, changes)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such discipline"))
}

/// DELETE /disciplines/:id
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Option<JsonBody<RoleOnly>>,
) -> ApiResult<()> {
    caller.authorize(body_role(&body), EDITORS)?;
    let id = parse_id(&id)?;

    if !state.disciplines.delete(id).await? {
        return Err(ApiError::not_found("No such discipline"));
    }
    Ok(ApiResponse::no_content())
}
