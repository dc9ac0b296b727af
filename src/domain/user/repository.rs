//! User repository trait

use async_trait::async_trait;

use super::entity::{User, UserData};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Storage collaborator for accounts
///
/// Implementations own password hashing and uniqueness of phone numbers.
/// A duplicate phone number surfaces as `DomainError::Conflict`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user and return it with its assigned id
    async fn create_user(&self, data: &UserData) -> Result<User, DomainError>;

    /// Verify a phone/password pair, counting the login on success
    async fn login(&self, phone_number: &str, password: &str) -> Result<User, DomainError>;

    async fn get_user_by_id(&self, id: &str) -> Result<User, DomainError>;

    /// Update the present fields of `data` for the given user
    async fn patch_user_by_id(&self, id: &str, data: &UserData) -> Result<User, DomainError>;
}
