//! Application state for shared services

use std::sync::Arc;

use crate::domain::auth::{AuthData, Credential};
use crate::domain::user::{User, UserData, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::AuthService;
use crate::infrastructure::user::UserService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub auth_service: Arc<dyn AuthServiceTrait>,
}

impl AppState {
    /// Wire both services over one repository
    pub fn from_parts<R>(
        repository: Arc<R>,
        tokens: Arc<dyn crate::infrastructure::auth::TokenService>,
    ) -> Self
    where
        R: UserRepository + ?Sized + 'static,
    {
        Self {
            user_service: Arc::new(UserService::new(repository.clone())),
            auth_service: Arc::new(AuthService::new(repository, tokens)),
        }
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, data: UserData) -> Result<User, DomainError>;
    async fn get(&self, id: &str) -> Result<User, DomainError>;
    async fn patch(&self, id: &str, data: UserData) -> Result<User, DomainError>;
}

/// Trait for auth service operations
#[async_trait::async_trait]
pub trait AuthServiceTrait: Send + Sync {
    async fn login(&self, credential: Credential) -> Result<AuthData, DomainError>;
    fn verify_auth_header(&self, header: &str) -> Result<String, DomainError>;
    fn authorize(&self, header: &str, resource_id: &str) -> Result<String, DomainError>;
}

#[async_trait::async_trait]
impl<R: UserRepository + ?Sized + 'static> UserServiceTrait for UserService<R> {
    async fn register(&self, data: UserData) -> Result<User, DomainError> {
        UserService::register(self, data).await
    }

    async fn get(&self, id: &str) -> Result<User, DomainError> {
        UserService::get(self, id).await
    }

    async fn patch(&self, id: &str, data: UserData) -> Result<User, DomainError> {
        UserService::patch(self, id, data).await
    }
}

#[async_trait::async_trait]
impl<R: UserRepository + ?Sized + 'static> AuthServiceTrait for AuthService<R> {
    async fn login(&self, credential: Credential) -> Result<AuthData, DomainError> {
        AuthService::login(self, credential).await
    }

    fn verify_auth_header(&self, header: &str) -> Result<String, DomainError> {
        AuthService::verify_auth_header(self, header)
    }

    fn authorize(&self, header: &str, resource_id: &str) -> Result<String, DomainError> {
        AuthService::authorize(self, header, resource_id)
    }
}
