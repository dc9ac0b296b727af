//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered account
///
/// The id is assigned by the store and never changes afterwards. The
/// password never lives on this type; the repository owns its hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: String,
    full_name: String,
    phone_number: String,
    login_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered user
    pub fn new(
        id: impl Into<String>,
        full_name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: id.into(),
            full_name: full_name.into(),
            phone_number: phone_number.into(),
            login_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from stored columns
    pub fn restore(
        id: impl Into<String>,
        full_name: impl Into<String>,
        phone_number: impl Into<String>,
        login_count: i32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            phone_number: phone_number.into(),
            login_count,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn login_count(&self) -> i32 {
        self.login_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_full_name(&mut self, full_name: impl Into<String>) {
        self.full_name = full_name.into();
        self.touch();
    }

    pub fn set_phone_number(&mut self, phone_number: impl Into<String>) {
        self.phone_number = phone_number.into();
        self.touch();
    }

    /// Count a successful login
    pub fn record_login(&mut self) {
        self.login_count = self.login_count.saturating_add(1);
    }

    /// Apply the present fields of a partial update
    pub fn apply(&mut self, data: &UserData) {
        if data.has_full_name() {
            self.set_full_name(data.full_name.as_str());
        }
        if data.has_phone_number() {
            self.set_phone_number(data.phone_number.as_str());
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Input for register and patch
///
/// An empty string means the field is absent.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
}

impl UserData {
    pub fn new(
        full_name: impl Into<String>,
        phone_number: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            phone_number: phone_number.into(),
            password: password.into(),
        }
    }

    /// Trim surrounding whitespace from name and phone number
    pub fn trim_profile(&mut self) {
        trim_in_place(&mut self.full_name);
        trim_in_place(&mut self.phone_number);
    }

    /// Trim every field, password included
    pub fn trim_all(&mut self) {
        self.trim_profile();
        trim_in_place(&mut self.password);
    }

    pub fn has_full_name(&self) -> bool {
        !self.full_name.is_empty()
    }

    pub fn has_phone_number(&self) -> bool {
        !self.phone_number.is_empty()
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }
}

impl std::fmt::Debug for UserData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserData")
            .field("full_name", &self.full_name)
            .field("phone_number", &self.phone_number)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}
