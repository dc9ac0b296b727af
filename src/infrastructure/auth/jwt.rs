//! RS256 access token issuance and verification

use std::fmt::Debug;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::keys::KeyPair;
use crate::domain::user::User;
use crate::domain::DomainError;

pub const TOKEN_ISSUER: &str = "account-service";
pub const TOKEN_AUDIENCE: &str = "account-service";

/// Scheme expected in the `Authorization` header
pub const AUTH_SCHEME: &str = "Bearer";

/// Algorithms a presented token may declare; everything else is rejected
/// before the signature is looked at.
const RSA_ALGORITHMS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// Claim set carried by every access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    pub iss: String,
    pub aud: String,
    /// Issued at (Unix epoch seconds)
    pub iat: i64,
    /// Not before (Unix epoch seconds)
    pub nbf: i64,
    /// Expiration (Unix epoch seconds)
    pub exp: i64,
}

impl AccessClaims {
    fn new(subject: &str, now: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            sub: subject.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }
}

/// Issues and verifies access tokens
pub trait TokenService: Send + Sync + Debug {
    /// Sign a token for the given user
    fn issue(&self, user: &User) -> Result<String, DomainError>;

    /// Verify a raw token and return its subject
    fn verify(&self, token: &str) -> Result<String, DomainError>;
}

/// Extract the raw token from a `Bearer <token>` header value
pub fn parse_auth_header(header: &str) -> Result<&str, DomainError> {
    let parts: Vec<&str> = header.trim().split(' ').collect();

    match parts.as_slice() {
        [scheme, token] if *scheme == AUTH_SCHEME && !token.is_empty() => Ok(token),
        _ => Err(DomainError::InvalidToken),
    }
}

/// `TokenService` backed by an RSA key pair
#[derive(Clone)]
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("lifetime", &self.lifetime)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtTokenService {
    /// Build the service from PEM encoded keys
    ///
    /// The keys are exercised with a sign/verify probe, so unparseable or
    /// mismatched keys fail here instead of on the first login.
    pub fn from_pem(
        private_pem: &[u8],
        public_pem: &[u8],
        lifetime: std::time::Duration,
    ) -> Result<Self, DomainError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem).map_err(|e| {
            DomainError::configuration(format!("Invalid RSA private key: {}", e))
        })?;

        let decoding_key = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| DomainError::configuration(format!("Invalid RSA public key: {}", e)))?;

        if lifetime.is_zero() {
            return Err(DomainError::configuration("Token lifetime must be positive"));
        }

        let lifetime = Duration::from_std(lifetime)
            .map_err(|e| DomainError::configuration(format!("Invalid token lifetime: {}", e)))?;

        let service = Self {
            encoding_key,
            decoding_key,
            validation: build_validation(),
            lifetime,
        };

        let probe = service
            .issue_at("key-probe", Utc::now())
            .map_err(|e| DomainError::configuration(format!("RSA private key unusable: {}", e)))?;

        service.decode_claims(&probe).map_err(|e| {
            DomainError::configuration(format!("RSA key pair does not match: {}", e))
        })?;

        Ok(service)
    }

    pub fn from_key_pair(pair: &KeyPair, lifetime: std::time::Duration) -> Result<Self, DomainError> {
        Self::from_pem(pair.private_pem.as_bytes(), pair.public_pem.as_bytes(), lifetime)
    }

    /// Sign a token for `subject` as if issued at `now`
    pub(crate) fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, DomainError> {
        let claims = AccessClaims::new(subject, now, self.lifetime);

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| DomainError::signing(format!("Failed to sign access token: {}", e)))
    }

    /// Check the algorithm, then the signature and claims
    pub fn decode_claims(&self, token: &str) -> Result<AccessClaims, DomainError> {
        let header = decode_header(token).map_err(map_jwt_error)?;

        if !RSA_ALGORITHMS.contains(&header.alg) {
            return Err(DomainError::InvalidSigningMethod);
        }

        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<String, DomainError> {
        self.issue_at(user.id(), Utc::now())
    }

    fn verify(&self, token: &str) -> Result<String, DomainError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }
}

fn build_validation() -> Validation {
    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.algorithms = RSA_ALGORITHMS.to_vec();
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_audience(&[TOKEN_AUDIENCE]);
    validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss", "aud"]);
    validation
}

fn map_jwt_error(error: jsonwebtoken::errors::Error) -> DomainError {
    match error.kind() {
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => DomainError::TokenFormat,
        ErrorKind::InvalidSignature => DomainError::TokenSignature,
        ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => DomainError::TokenExpired,
        ErrorKind::InvalidAlgorithm => DomainError::InvalidSigningMethod,
        _ => DomainError::token_verification(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{key_pair, other_key_pair, token_service, TEST_TOKEN_LIFETIME};

    fn create_test_user() -> User {
        User::new("user-123", "Edison", "+6285156305136")
    }

    fn sign_with_private_key(claims: &AccessClaims) -> String {
        let key = EncodingKey::from_rsa_pem(key_pair().private_pem.as_bytes()).unwrap();
        encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let service = token_service();
        let user = create_test_user();

        let token = service.issue(&user).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let subject = service.verify(&token).unwrap();
        assert_eq!(subject, "user-123");
    }

    #[test]
    fn test_claim_set() {
        let service = token_service();
        let token = service.issue(&create_test_user()).unwrap();

        let claims = service.decode_claims(&token).unwrap();
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.aud, TOKEN_AUDIENCE);
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 7200);

        let header = decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
    }

    #[test]
    fn test_expired_token() {
        let service = token_service();
        let token = service
            .issue_at("user-123", Utc::now() - Duration::hours(3))
            .unwrap();

        assert!(matches!(service.verify(&token), Err(DomainError::TokenExpired)));
    }

    #[test]
    fn test_not_yet_valid_token() {
        let service = token_service();
        let token = service
            .issue_at("user-123", Utc::now() + Duration::hours(1))
            .unwrap();

        assert!(matches!(service.verify(&token), Err(DomainError::TokenExpired)));
    }

    /// Current time, moved past the next second boundary when one is close
    fn early_in_second() -> DateTime<Utc> {
        let now = Utc::now();
        let millis = now.timestamp_subsec_millis();
        if millis < 800 {
            return now;
        }

        std::thread::sleep(std::time::Duration::from_millis(u64::from(1050 - millis)));
        Utc::now()
    }

    #[test]
    fn test_token_valid_at_expiry_instant() {
        let service = token_service();
        let lifetime = Duration::from_std(TEST_TOKEN_LIFETIME).unwrap();

        let token = service
            .issue_at("user-123", early_in_second() - lifetime)
            .unwrap();

        assert_eq!(service.verify(&token).unwrap(), "user-123");
    }

    #[test]
    fn test_token_expired_just_after_expiry() {
        let service = token_service();
        let lifetime = Duration::from_std(TEST_TOKEN_LIFETIME).unwrap();

        let token = service
            .issue_at("user-123", early_in_second() - lifetime - Duration::seconds(2))
            .unwrap();

        assert!(matches!(service.verify(&token), Err(DomainError::TokenExpired)));
    }

    #[test]
    fn test_unsigned_token_is_a_format_error() {
        let service = token_service();
        let signed = service.issue(&create_test_user()).unwrap();
        let payload = signed.split('.').nth(1).unwrap();

        // {"alg":"none","typ":"JWT"}
        let unsigned = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", payload);

        assert!(matches!(service.verify(&unsigned), Err(DomainError::TokenFormat)));
    }

    #[test]
    fn test_malformed_token() {
        let service = token_service();

        assert!(matches!(service.verify("not-a-token"), Err(DomainError::TokenFormat)));
        assert!(matches!(service.verify("a.b.c"), Err(DomainError::TokenFormat)));
    }

    #[test]
    fn test_swapped_payload_fails_signature() {
        let service = token_service();
        let alice = service.issue_at("alice", Utc::now()).unwrap();
        let bob = service.issue_at("bob", Utc::now()).unwrap();

        let alice_parts: Vec<&str> = alice.split('.').collect();
        let bob_parts: Vec<&str> = bob.split('.').collect();
        let forged = format!("{}.{}.{}", alice_parts[0], bob_parts[1], alice_parts[2]);

        assert!(matches!(service.verify(&forged), Err(DomainError::TokenSignature)));
    }

    #[test]
    fn test_token_from_other_key() {
        let service = token_service();
        let other = JwtTokenService::from_key_pair(
            other_key_pair(),
            std::time::Duration::from_secs(7200),
        )
        .unwrap();

        let token = other.issue(&create_test_user()).unwrap();
        assert!(matches!(service.verify(&token), Err(DomainError::TokenSignature)));
    }

    #[test]
    fn test_rejects_hmac_token() {
        let service = token_service();
        let claims = AccessClaims::new("user-123", Utc::now(), Duration::hours(1));

        // HMAC keyed with the public key is the classic confusion attack
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(key_pair().public_pem.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(DomainError::InvalidSigningMethod)
        ));
    }

    #[test]
    fn test_wrong_issuer() {
        let service = token_service();
        let mut claims = AccessClaims::new("user-123", Utc::now(), Duration::hours(1));
        claims.iss = "someone-else".to_string();

        let result = service.verify(&sign_with_private_key(&claims));
        assert!(matches!(result, Err(DomainError::TokenVerification { .. })));
    }

    #[test]
    fn test_wrong_audience() {
        let service = token_service();
        let mut claims = AccessClaims::new("user-123", Utc::now(), Duration::hours(1));
        claims.aud = "another-app".to_string();

        let result = service.verify(&sign_with_private_key(&claims));
        assert!(matches!(result, Err(DomainError::TokenVerification { .. })));
    }

    #[test]
    fn test_from_pem_rejects_garbage() {
        let result = JwtTokenService::from_pem(
            b"not a key",
            key_pair().public_pem.as_bytes(),
            std::time::Duration::from_secs(60),
        );
        assert!(matches!(result, Err(DomainError::Configuration { .. })));

        let result = JwtTokenService::from_pem(
            key_pair().private_pem.as_bytes(),
            b"not a key",
            std::time::Duration::from_secs(60),
        );
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_from_pem_rejects_mismatched_pair() {
        let result = JwtTokenService::from_pem(
            key_pair().private_pem.as_bytes(),
            other_key_pair().public_pem.as_bytes(),
            std::time::Duration::from_secs(60),
        );
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_from_pem_rejects_zero_lifetime() {
        let result = JwtTokenService::from_key_pair(key_pair(), std::time::Duration::ZERO);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug = format!("{:?}", token_service());
        assert!(debug.contains("[hidden]"));
        assert!(debug.contains("RS256"));
    }

    // Header parsing
    #[test]
    fn test_parse_auth_header() {
        assert_eq!(parse_auth_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert_eq!(parse_auth_header("  Bearer abc  ").unwrap(), "abc");
    }

    #[test]
    fn test_parse_auth_header_rejects_malformed() {
        for header in ["token", "bear token", "bearer token", "Bearer", "Bearer ", "", "Bearer a b", "Bearer  a"] {
            assert!(
                matches!(parse_auth_header(header), Err(DomainError::InvalidToken)),
                "header {:?}",
                header
            );
        }
    }

    #[test]
    fn test_parse_then_verify() {
        let service = token_service();
        let token = service.issue(&create_test_user()).unwrap();

        let header = format!("Bearer {}", token);
        let raw = parse_auth_header(&header).unwrap();
        assert_eq!(service.verify(raw).unwrap(), "user-123");
    }
}
