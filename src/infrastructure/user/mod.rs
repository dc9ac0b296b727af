//! User infrastructure module
//!
//! The user service plus the two repository backends: in-memory with
//! argon2 hashes and PostgreSQL with `pgcrypto`.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::UserService;
