//! Bearer header extraction

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::api::types::ApiError;
use crate::domain::DomainError;

/// Raw `Authorization` header value
///
/// An absent header yields an empty string, so the auth service rejects
/// it the same way as any other malformed header.
#[derive(Debug, Clone)]
pub struct AuthHeader(pub String);

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_auth_header(&parts.headers).map(AuthHeader)
    }
}

pub fn extract_auth_header(headers: &HeaderMap) -> Result<String, ApiError> {
    match headers.get(header::AUTHORIZATION) {
        None => Ok(String::new()),
        Some(value) => value
            .to_str()
            .map(str::to_string)
            .map_err(|_| ApiError::from(DomainError::InvalidToken)),
    }
}
