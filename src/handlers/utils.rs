// handlers/utils.rs - helpers shared by the resource handlers

use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::JsonBody;

pub const NO_DATA: &str = "No data passed in the body";

/// Body of requests that carry nothing but the caller's role.
#[derive(Debug, Default, Deserialize)]
pub struct RoleOnly {
    pub role: Option<String>,
}

pub fn body_role(body: &Option<JsonBody<RoleOnly>>) -> Option<&str> {
    body.as_ref().and_then(|JsonBody(b)| b.role.as_deref())
}

/// Path ids are non-negative integers.
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| ApiError::bad_request("Incorrect Id passed"))
}
