//! Login secret hashing for repositories that keep credentials in-process
//!
//! Stored values are PHC strings, so the algorithm and cost travel with each
//! hash and older hashes keep verifying after the cost is raised.

use std::fmt::Debug;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::DomainError;

pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a login secret into a PHC string
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Whether `password` is the secret behind `stored`; unreadable hashes never match
    fn matches(&self, password: &str, stored: &str) -> bool;
}

/// Argon2id at the crate's default costs
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn matches(&self, password: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            // Costs come from the stored hash, not from `self`
            Ok(parsed) => self
                .argon2()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
