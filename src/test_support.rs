//! Shared fixtures for unit tests
//!
//! RSA generation is slow, so each test binary creates its keys once.

use std::sync::OnceLock;
use std::time::Duration;

use crate::infrastructure::auth::{generate_key_pair, JwtTokenService, KeyPair};

pub const TEST_TOKEN_LIFETIME: Duration = Duration::from_secs(7200);

pub fn key_pair() -> &'static KeyPair {
    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| generate_key_pair(2048).expect("generate test key pair"))
}

pub fn other_key_pair() -> &'static KeyPair {
    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| generate_key_pair(2048).expect("generate second test key pair"))
}

pub fn token_service() -> JwtTokenService {
    JwtTokenService::from_key_pair(key_pair(), TEST_TOKEN_LIFETIME).expect("build token service")
}
