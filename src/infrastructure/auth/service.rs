//! Login and bearer-token checks

use std::sync::Arc;

use crate::domain::auth::{AuthData, Credential};
use crate::domain::user::UserRepository;
use crate::domain::DomainError;

use super::jwt::{parse_auth_header, TokenService};

/// Auth service: the entry point the transport layer uses for
/// authentication
pub struct AuthService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    tokens: Arc<dyn TokenService>,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(repository: Arc<R>, tokens: Arc<dyn TokenService>) -> Self {
        Self { repository, tokens }
    }

    /// Check the credential with the repository and issue a token
    ///
    /// Repository failures come back unchanged.
    pub async fn login(&self, credential: Credential) -> Result<AuthData, DomainError> {
        let user = self
            .repository
            .login(&credential.phone_number, &credential.password)
            .await?;

        let access_token = self.tokens.issue(&user)?;

        Ok(AuthData {
            id: user.id().to_string(),
            access_token,
        })
    }

    /// Parse a `Bearer` header and return the verified subject
    pub fn verify_auth_header(&self, header: &str) -> Result<String, DomainError> {
        let token = parse_auth_header(header)?;
        self.tokens.verify(token)
    }

    /// Verify the header and require its subject to own `resource_id`
    pub fn authorize(&self, header: &str, resource_id: &str) -> Result<String, DomainError> {
        let subject = self.verify_auth_header(header)?;

        if subject != resource_id {
            return Err(DomainError::NotAuthorized);
        }

        Ok(subject)
    }
}
