use axum::extract::FromRequest;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// `axum::Json` with rejections rendered as `ApiError` bodies.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// A JSON body for role-gated writes. Only the caller's `role` is read up
/// front; the payload is typed once the gate has passed, so a forbidden
/// caller gets 403 however incomplete the rest of the body is.
#[derive(Debug, serde::Deserialize, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct GatedBody(Value);

impl GatedBody {
    /// The body's `role` field. Anything but a string counts as absent.
    pub fn role(&self) -> Option<&str> {
        self.0.get("role").and_then(Value::as_str)
    }

    /// Deserialize the payload; missing or mistyped fields are a 400.
    pub fn into_payload<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.0).map_err(|e| {
            tracing::debug!("Rejected request body: {}", e);
            ApiError::bad_request("Incorrect data passed")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn role_is_read_without_typing_the_payload() {
        let body = GatedBody(json!({"role": "student"}));
        assert_eq!(body.role(), Some("student"));
        assert!(GatedBody(json!({"role": 3})).role().is_none());
        assert!(GatedBody(json!([1, 2])).role().is_none());
    }

    #[test]
    fn payload_errors_are_bad_requests() {
        let err = GatedBody(json!({"role": "manager"})).into_payload::<Named>().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Incorrect data passed");

        let named: Named = GatedBody(json!({"role": "manager", "name": "Math"})).into_payload().unwrap();
        assert_eq!(named.name, "Math");
    }
}
