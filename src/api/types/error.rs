//! Error body returned by every endpoint
//!
//! `{"message": "<status text>", "details": ["...", ...]}` with one detail
//! per underlying failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
    pub details: Vec<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, details: Vec<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                message: status.canonical_reason().unwrap_or("Error").to_string(),
                details,
            },
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, vec![detail.into()])
    }

    /// Map a domain error to `status`, unless it is a server-side fault
    ///
    /// Storage, signing, configuration and internal failures always
    /// become a 500 with their message kept out of the body.
    pub fn from_domain(err: DomainError, status: StatusCode) -> Self {
        if is_server_fault(&err) {
            error!(error = %err, "Request failed with server error");
            return Self::internal("internal server error");
        }

        Self::new(status, details_of(&err))
    }
}

fn is_server_fault(err: &DomainError) -> bool {
    matches!(
        err,
        DomainError::Storage { .. }
            | DomainError::Internal { .. }
            | DomainError::Signing { .. }
            | DomainError::Configuration { .. }
    )
}

/// One entry per contained validation failure, otherwise the error text
fn details_of(err: &DomainError) -> Vec<String> {
    match err.validation_errors() {
        Some(errors) => errors.iter().map(|e| e.to_string()).collect(),
        None => vec![err.to_string()],
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::Validation(_)
            | DomainError::RequiredFieldMissing { .. }
            | DomainError::Credential { .. } => StatusCode::BAD_REQUEST,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict { .. } => StatusCode::CONFLICT,
            DomainError::NotAuthorized => StatusCode::FORBIDDEN,
            e if e.is_token_error() => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self::from_domain(err, status)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.message,
            self.response.details.join("; ")
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{UserValidationError, ValidationErrors};

    #[test]
    fn test_message_is_status_text() {
        let err = ApiError::new(StatusCode::BAD_REQUEST, vec!["invalid phone prefix".to_string()]);

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.message, "Bad Request");
        assert_eq!(err.response.details, vec!["invalid phone prefix"]);
    }

    #[test]
    fn test_validation_yields_one_detail_per_failure() {
        let mut errors = ValidationErrors::new();
        errors.push(UserValidationError::InvalidNameLength);
        errors.push(UserValidationError::InvalidPhoneLength);

        let err = ApiError::from(DomainError::from(errors));

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.response.details,
            vec!["invalid name length", "invalid phone length"]
        );
    }

    #[test]
    fn test_domain_error_statuses() {
        let cases = [
            (DomainError::required("user ID required"), StatusCode::BAD_REQUEST),
            (DomainError::credential("no match"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("User 'x' not found"), StatusCode::NOT_FOUND),
            (DomainError::conflict("phone"), StatusCode::CONFLICT),
            (DomainError::NotAuthorized, StatusCode::FORBIDDEN),
            (DomainError::InvalidToken, StatusCode::FORBIDDEN),
            (DomainError::TokenExpired, StatusCode::FORBIDDEN),
            (DomainError::storage("db down"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::signing("bad key"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain, status) in cases {
            assert_eq!(ApiError::from(domain).status, status);
        }
    }

    #[test]
    fn test_server_faults_hide_details() {
        let err = ApiError::from_domain(
            DomainError::storage("connection refused to 10.0.0.5"),
            StatusCode::BAD_REQUEST,
        );

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.response.message, "Internal Server Error");
        assert!(!err.response.details[0].contains("10.0.0.5"));
    }

    #[test]
    fn test_from_domain_overrides_status() {
        let err = ApiError::from_domain(DomainError::conflict("phone"), StatusCode::BAD_REQUEST);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::from(DomainError::NotAuthorized);
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "message": "Forbidden",
                "details": ["user not authorized for this action"]
            })
        );
    }
}
