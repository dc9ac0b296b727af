//! User endpoint payloads

use serde::{Deserialize, Serialize};

use crate::domain::auth::Credential;
use crate::domain::user::{User, UserData};

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
}

impl From<RegisterRequest> for UserData {
    fn from(request: RegisterRequest) -> Self {
        UserData::new(request.full_name, request.phone_number, request.password)
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
}

impl From<LoginRequest> for Credential {
    fn from(request: LoginRequest) -> Self {
        Credential::new(request.phone_number, request.password)
    }
}

/// Profile changes accepted over HTTP; passwords cannot be changed here
#[derive(Debug, Default, Deserialize)]
pub struct PatchUserRequest {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

impl From<PatchUserRequest> for UserData {
    fn from(request: PatchUserRequest) -> Self {
        UserData {
            full_name: request.full_name.unwrap_or_default(),
            phone_number: request.phone_number.unwrap_or_default(),
            password: String::new(),
        }
    }
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub phone_number: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            full_name: user.full_name().to_string(),
            phone_number: user.phone_number().to_string(),
        }
    }
}
