pub mod auth;
pub mod json;
pub mod response;

pub use auth::Caller;
pub use json::{GatedBody, JsonBody};
pub use response::{ApiResponse, ApiResult};
