//! User service for registration and profile management

use std::sync::Arc;

use crate::domain::user::{validate_user_data, User, UserData, UserRepository};
use crate::domain::DomainError;

/// User service
///
/// Trims and validates input before anything reaches the repository.
/// Ownership of the target id is checked by the caller.
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Register a new user; all three fields are required
    pub async fn register(&self, mut data: UserData) -> Result<User, DomainError> {
        data.trim_all();

        if !data.has_full_name() || !data.has_phone_number() || !data.has_password() {
            return Err(DomainError::required(
                "fullname, phone and password required",
            ));
        }

        validate_user_data(&data)?;

        self.repository.create_user(&data).await
    }

    pub async fn get(&self, id: &str) -> Result<User, DomainError> {
        if id.is_empty() {
            return Err(DomainError::required("user ID required"));
        }

        self.repository.get_user_by_id(id).await
    }

    /// Update the present fields of a user
    ///
    /// A `Conflict` from the repository is returned as is.
    pub async fn patch(&self, id: &str, mut data: UserData) -> Result<User, DomainError> {
        if id.is_empty() {
            return Err(DomainError::required("user ID required"));
        }

        data.trim_profile();
        validate_user_data(&data)?;

        self.repository.patch_user_by_id(id, &data).await
    }
}
