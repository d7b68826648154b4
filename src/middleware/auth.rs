use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;
use crate::types::Role;

/// Who is calling. Carries verified token claims when the request sent a
/// bearer token; otherwise the role falls back to the one in the body.
#[derive(Clone, Debug, Default)]
pub struct Caller {
    pub claims: Option<Claims>,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_jwt_from_headers(&parts.headers)? else {
            return Ok(Caller::default());
        };
        let claims = validate_jwt(&token)?;
        Ok(Caller { claims: Some(claims) })
    }
}

impl Caller {
    /// Token role first, then the body's `role` field. Unknown role
    /// strings resolve to no role at all.
    pub fn role(&self, body_role: Option<&str>) -> Option<Role> {
        match &self.claims {
            Some(claims) => Some(claims.role),
            None => body_role.and_then(|role| role.parse().ok()),
        }
    }

    pub fn authorize(&self, body_role: Option<&str>, allowed: &[Role]) -> Result<Role, ApiError> {
        match self.role(body_role) {
            Some(role) if allowed.contains(&role) => Ok(role),
            _ => Err(ApiError::forbidden("Access denied")),
        }
    }
}

/// Extract JWT token from Authorization header, if one was sent
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let Some(auth_header) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        Some(_) => Err(ApiError::unauthorized("Empty JWT token")),
        None => Err(ApiError::unauthorized("Authorization header must use Bearer token format")),
    }
}
