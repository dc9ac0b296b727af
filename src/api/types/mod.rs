//! Request/response types shared by the handlers

pub mod error;
pub mod json;
pub mod user;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use user::{LoginRequest, PatchUserRequest, RegisterRequest, UserResponse};
