//! User domain
//!
//! Account entity, partial-update input, the validation engine and the
//! storage trait the services depend on.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserData};
pub use repository::UserRepository;
pub use validation::{
    validate_full_name, validate_password, validate_phone_number, validate_user_data,
    UserValidationError, ValidationErrors, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH,
    MAX_PHONE_LENGTH, MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH, MIN_PHONE_LENGTH, PHONE_PREFIX,
};

#[cfg(test)]
pub use repository::MockUserRepository;
