//! Authentication domain types

use serde::{Deserialize, Serialize};

/// Phone number and presented password for a login attempt
///
/// Only lives for the duration of a request.
#[derive(Clone, Deserialize)]
pub struct Credential {
    pub phone_number: String,
    pub password: String,
}

impl Credential {
    pub fn new(phone_number: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("phone_number", &self.phone_number)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthData {
    pub id: String,
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_redacts_password() {
        let credential = Credential::new("+6285156305136", "Passw0rd@");
        let debug = format!("{:?}", credential);

        assert!(debug.contains("+6285156305136"));
        assert!(!debug.contains("Passw0rd@"));
    }
}
