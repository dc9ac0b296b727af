use thiserror::Error;

use super::user::{UserValidationError, ValidationErrors};

/// Core domain errors
///
/// Every failure the account core can surface. Token and validation variants
/// carry no payload so callers can match on them directly; repository and
/// key-material failures keep the collaborator's message.
#[derive(Debug, Error)]
pub enum DomainError {
    /// One or more field-level validation failures
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{message}")]
    RequiredFieldMissing { message: String },

    #[error("error invalid token")]
    InvalidToken,

    #[error("invalid token format")]
    TokenFormat,

    #[error("invalid signature")]
    TokenSignature,

    #[error("invalid token expired")]
    TokenExpired,

    #[error("invalid signing method")]
    InvalidSigningMethod,

    #[error("token verification failed: {message}")]
    TokenVerification { message: String },

    #[error("user not authorized for this action")]
    NotAuthorized,

    #[error("error data conflict: {message}")]
    Conflict { message: String },

    #[error("{message}")]
    Credential { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Signing error: {message}")]
    Signing { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn required(message: impl Into<String>) -> Self {
        Self::RequiredFieldMissing {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn token_verification(message: impl Into<String>) -> Self {
        Self::TokenVerification {
            message: message.into(),
        }
    }

    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The aggregated field failures, if this is a validation error
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Whether this is a validation error containing the given failure kind
    pub fn has_validation(&self, kind: UserValidationError) -> bool {
        self.validation_errors()
            .is_some_and(|errors| errors.contains(kind))
    }

    /// Whether the bearer token was missing, malformed, forged or stale
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken
                | Self::TokenFormat
                | Self::TokenSignature
                | Self::TokenExpired
                | Self::InvalidSigningMethod
                | Self::TokenVerification { .. }
        )
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<UserValidationError> for DomainError {
    fn from(error: UserValidationError) -> Self {
        Self::Validation(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("User 'abc' not found");
        assert_eq!(error.to_string(), "Not found: User 'abc' not found");
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("phone number already registered");
        assert_eq!(
            error.to_string(),
            "error data conflict: phone number already registered"
        );
    }

    #[test]
    fn test_credential_error_is_verbatim() {
        let error = DomainError::credential("phone and password do not match");
        assert_eq!(error.to_string(), "phone and password do not match");
    }

    #[test]
    fn test_validation_error_keeps_every_kind() {
        let mut errors = ValidationErrors::new();
        errors.push(UserValidationError::InvalidNameLength);
        errors.push(UserValidationError::InvalidPhoneLength);

        let error = DomainError::from(errors);

        assert!(error.has_validation(UserValidationError::InvalidNameLength));
        assert!(error.has_validation(UserValidationError::InvalidPhoneLength));
        assert!(!error.has_validation(UserValidationError::InvalidPasswordFormat));
        assert_eq!(
            error.to_string(),
            "invalid name length; invalid phone length"
        );
    }

    #[test]
    fn test_token_error_classification() {
        assert!(DomainError::InvalidToken.is_token_error());
        assert!(DomainError::TokenExpired.is_token_error());
        assert!(DomainError::InvalidSigningMethod.is_token_error());
        assert!(!DomainError::NotAuthorized.is_token_error());
        assert!(!DomainError::conflict("x").is_token_error());
    }
}
