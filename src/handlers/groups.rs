// handlers/groups.rs - /groups routes, including curriculum links

use axum::extract::{Path, State};
use serde::Deserialize;

use crate::database::models::{Discipline, Group, GroupDiscipline};
use crate::error::ApiError;
use crate::handlers::utils::{body_role, parse_id, RoleOnly, NO_DATA};
use crate::middleware::{ApiResponse, ApiResult, Caller, GatedBody, JsonBody};
use crate::services::ServiceError;
use crate::state::AppState;
use crate::types::Role;

const GROUP_ADMINS: &[Role] = &[Role::Manager];
const LINK_ADMINS: &[Role] = &[Role::Manager, Role::Admin];

#[derive(Debug, Deserialize)]
pub struct GroupRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
    pub group_id: Option<i32>,
    pub discipline_id: Option<i32>,
}

/// POST /groups/
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    body: GatedBody,
) -> ApiResult<Group> {
    caller.authorize(body.role(), GROUP_ADMINS)?;
    let body: GroupRequest = body.into_payload()?;
    let name = body.name.ok_or_else(|| ApiError::bad_request("Incorrect data passed"))?;
    Ok(ApiResponse::created(state.groups.create(&name).await?))
}

/// GET /groups/
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Group>> {
    Ok(ApiResponse::success(state.groups.get_all().await?))
}

/// GET /groups/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Group> {
    let id = parse_id(&id)?;
    state
        .groups
        .get_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such group"))
}

/// PUT /groups/:id
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: GatedBody,
) -> ApiResult<Group> {
    caller.authorize(body.role(), GROUP_ADMINS)?;
    let id = parse_id(&id)?;
    let body: GroupRequest = body.into_payload()?;
    let name = body.name.ok_or_else(|| ApiError::bad_request(NO_DATA))?;

    state
        .groups
        .update(id, &name)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No such group"))
}

/// DELETE /groups/:id
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Option<JsonBody<RoleOnly>>,
) -> ApiResult<()> {
    caller.authorize(body_role(&body), GROUP_ADMINS)?;
    let id = parse_id(&id)?;

    if !state.groups.delete(id).await? {
        return Err(ApiError::not_found("No such group"));
    }
    Ok(ApiResponse::no_content())
}

/// POST /groups/link
pub async fn link(
    State(state): State<AppState>,
    caller: Caller,
    body: GatedBody,
) -> ApiResult<GroupDiscipline> {
    caller.authorize(body.role(), LINK_ADMINS)?;
    let body: LinkRequest = body.into_payload()?;
    let (Some(group_id), Some(discipline_id)) = (body.group_id, body.discipline_id) else {
        return Err(ApiError::bad_request("Incorrect Ids passed"));
    };

    match state.group_disciplines.link(group_id, discipline_id).await {
        Ok(link) => Ok(ApiResponse::created(link)),
        Err(ServiceError::InvalidData(_)) => Err(ApiError::bad_request("Incorrect Ids passed")),
        Err(e) => Err(e.into()),
    }
}

/// GET /groups/links
pub async fn list_links(State(state): State<AppState>) -> ApiResult<Vec<GroupDiscipline>> {
    Ok(ApiResponse::success(state.group_disciplines.get_all().await?))
}

/// GET /groups/disciplines/:groupId
pub async fn list_disciplines(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> ApiResult<Vec<Discipline>> {
    let group_id = parse_id(&group_id)?;
    let disciplines = state.disciplines.get_by_group_id(group_id).await?;
    if disciplines.is_empty() {
        return Err(ApiError::not_found("No disciplines found for group"));
    }
    Ok(ApiResponse::success(disciplines))
}
