//! User endpoints
//!
//! Each handler picks the status for its own failure modes; ownership of
//! `{id}` is checked through the auth service before the user service runs.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tracing::{info, warn};

use crate::api::middleware::AuthHeader;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, Json, LoginRequest, PatchUserRequest, RegisterRequest, UserResponse,
};
use crate::domain::auth::AuthData;
use crate::domain::DomainError;

pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/users/login", post(login))
        .route("/users/{id}", get(get_user).patch(patch_user))
}

/// POST /users
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .register(request.into())
        .await
        .map_err(|e| {
            warn!(error = %e, "Registration rejected");
            ApiError::from_domain(e, StatusCode::BAD_REQUEST)
        })?;

    info!(user_id = %user.id(), "User registered");
    Ok(Json(UserResponse::from(&user)))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthData>, ApiError> {
    let auth = state
        .auth_service
        .login(request.into())
        .await
        .map_err(|e| {
            warn!(error = %e, "Login rejected");
            ApiError::from_domain(e, StatusCode::BAD_REQUEST)
        })?;

    info!(user_id = %auth.id, "User logged in");
    Ok(Json(auth))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthHeader(header): AuthHeader,
) -> Result<Json<UserResponse>, ApiError> {
    authorize(&state, &header, &id)?;

    let user = state.user_service.get(&id).await.map_err(|e| match e {
        DomainError::NotFound { .. } => ApiError::from(e),
        other => ApiError::from_domain(other, StatusCode::FORBIDDEN),
    })?;

    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /users/{id}
///
/// The body is only inspected once the caller owns `{id}`.
pub async fn patch_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AuthHeader(header): AuthHeader,
    body: Result<Json<PatchUserRequest>, ApiError>,
) -> Result<Json<UserResponse>, ApiError> {
    authorize(&state, &header, &id)?;
    let Json(request) = body?;

    let user = state
        .user_service
        .patch(&id, request.into())
        .await
        .map_err(|e| {
            warn!(user_id = %id, error = %e, "Profile update rejected");
            match e {
                DomainError::Conflict { .. } | DomainError::Validation(_) => ApiError::from(e),
                other => ApiError::from_domain(other, StatusCode::FORBIDDEN),
            }
        })?;

    info!(user_id = %user.id(), "Profile updated");
    Ok(Json(UserResponse::from(&user)))
}

fn authorize(state: &AppState, header: &str, id: &str) -> Result<String, ApiError> {
    state.auth_service.authorize(header, id).map_err(|e| {
        warn!(user_id = %id, error = %e, "Access denied");
        ApiError::from_domain(e, StatusCode::FORBIDDEN)
    })
}
