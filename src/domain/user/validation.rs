//! User validation utilities
//!
//! Every validator runs all of its checks and reports each failure, so a
//! client sees the complete list of problems in one round trip.

use std::fmt;

use thiserror::Error;
use unicode_general_category::{GeneralCategory, get_general_category};

use super::entity::UserData;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserValidationError {
    #[error("invalid name length")]
    InvalidNameLength,

    #[error("invalid password length")]
    InvalidPasswordLength,

    #[error("password must have capital, number and symbol")]
    InvalidPasswordFormat,

    #[error("invalid phone prefix")]
    InvalidPhonePrefix,

    #[error("invalid phone length")]
    InvalidPhoneLength,
}

pub const MIN_NAME_LENGTH: usize = 3;
pub const MAX_NAME_LENGTH: usize = 60;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 64;
pub const MIN_PHONE_LENGTH: usize = 10;
pub const MAX_PHONE_LENGTH: usize = 13;
pub const PHONE_PREFIX: &str = "+62";

/// Ordered collection of field-level validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<UserValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: UserValidationError) {
        self.0.push(error);
    }

    /// Append every failure from another collection, keeping order
    pub fn merge(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn contains(&self, kind: UserValidationError) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserValidationError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[UserValidationError] {
        &self.0
    }

    /// `Ok(())` when nothing failed, otherwise the collection itself
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<UserValidationError> for ValidationErrors {
    fn from(error: UserValidationError) -> Self {
        Self(vec![error])
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a UserValidationError;
    type IntoIter = std::slice::Iter<'a, UserValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Validate a full name
///
/// Rules:
/// - Between 3 and 60 characters (not bytes)
pub fn validate_full_name(name: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&name.chars().count()) {
        errors.push(UserValidationError::InvalidNameLength);
    }

    errors.into_result()
}

/// Validate a password
///
/// Rules:
/// - Between 6 and 64 characters
/// - At least one decimal digit, one uppercase letter and one punctuation
///   or symbol character
///
/// Both rules are always checked, so a short lowercase password reports
/// a length and a format failure.
pub fn validate_password(password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&password.chars().count()) {
        errors.push(UserValidationError::InvalidPasswordLength);
    }

    let (mut digit, mut upper, mut symbol) = (false, false, false);

    for c in password.chars() {
        match get_general_category(c) {
            GeneralCategory::DecimalNumber => digit = true,
            GeneralCategory::UppercaseLetter => upper = true,
            category if is_punctuation_or_symbol(category) => symbol = true,
            _ => {}
        }
    }

    if !(digit && upper && symbol) {
        errors.push(UserValidationError::InvalidPasswordFormat);
    }

    errors.into_result()
}

/// Validate a phone number
///
/// Rules:
/// - Must start with `+62`
/// - With the prefix replaced by a single `0`, between 10 and 13 characters
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    match phone.strip_prefix(PHONE_PREFIX) {
        None => errors.push(UserValidationError::InvalidPhonePrefix),
        Some(subscriber) => {
            let local_length = subscriber.chars().count() + 1;

            if !(MIN_PHONE_LENGTH..=MAX_PHONE_LENGTH).contains(&local_length) {
                errors.push(UserValidationError::InvalidPhoneLength);
            }
        }
    }

    errors.into_result()
}

/// Validate the present (non-empty) fields of a user payload
///
/// Failures are reported in field order: name, password, phone.
pub fn validate_user_data(data: &UserData) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if data.has_full_name() {
        if let Err(e) = validate_full_name(&data.full_name) {
            errors.merge(e);
        }
    }

    if data.has_password() {
        if let Err(e) = validate_password(&data.password) {
            errors.merge(e);
        }
    }

    if data.has_phone_number() {
        if let Err(e) = validate_phone_number(&data.phone_number) {
            errors.merge(e);
        }
    }

    errors.into_result()
}

fn is_punctuation_or_symbol(category: GeneralCategory) -> bool {
    matches!(
        category,
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
            | GeneralCategory::MathSymbol
            | GeneralCategory::CurrencySymbol
            | GeneralCategory::ModifierSymbol
            | GeneralCategory::OtherSymbol
    )
}
