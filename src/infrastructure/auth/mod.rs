//! Authentication infrastructure module
//!
//! RSA key handling, access token issuance/verification and the auth
//! service that ties them to the user repository.

mod jwt;
mod keys;
mod service;

pub use jwt::{
    parse_auth_header, AccessClaims, JwtTokenService, TokenService, AUTH_SCHEME, TOKEN_AUDIENCE,
    TOKEN_ISSUER,
};
pub use keys::{
    generate_key_pair, load_key_pair, write_key_pair, KeyPair, MIN_KEY_BITS, PRIVATE_KEY_FILE,
    PUBLIC_KEY_FILE,
};
pub use service::AuthService;
