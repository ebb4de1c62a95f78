use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Issuer claim written into every token.
pub const ISSUER: &str = "sample-auth-api";

/// Seconds a token stays valid after issuance.
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Error type for token operations.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Token is expired")]
    Expired,
}

/// Claims carried by an access token.
///
/// This service mints exactly one token shape: the authenticated username,
/// the issue and expiry instants, and a fixed issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    /// Claims for a freshly authenticated user, valid for one hour.
    pub fn for_user(username: impl Into<String>) -> Self {
        let now = Utc::now().timestamp();

        Self {
            username: username.into(),
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
            iss: ISSUER.to_string(),
        }
    }
}

/// Mints and decodes signed access tokens.
///
/// Uses HS256 (HMAC with SHA-256). The signing secret comes from process
/// configuration; it is never generated or persisted here.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenSigner {
    /// Create a signer from a secret key.
    ///
    /// The secret should be at least 256 bits (32 bytes) for HS256 and live
    /// in an environment variable or vault, never in code.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Sign claims into a token string.
    ///
    /// # Errors
    /// * `SigningFailed` - Encoding or signing failed
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Decode and validate a token issued by this signer.
    ///
    /// No endpoint of the service consumes tokens; this exists for library
    /// consumers and tests.
    ///
    /// # Errors
    /// * `Expired` - The exp claim is in the past
    /// * `DecodingFailed` - Bad signature, wrong issuer, or malformed token
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[ISSUER]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::DecodingFailed(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_decode() {
        let signer = TokenSigner::new(b"test_secret_key_at_least_32_bytes!");

        let token = signer
            .issue(&Claims::for_user("alice1"))
            .expect("Failed to issue token");
        assert!(!token.is_empty());

        let claims = signer.decode(&token).expect("Failed to decode token");
        assert_eq!(claims.username, "alice1");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECS);
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let signer = TokenSigner::new(b"secret1_at_least_32_bytes_long_key!");
        let other = TokenSigner::new(b"secret2_at_least_32_bytes_long_key!");

        let token = signer
            .issue(&Claims::for_user("alice1"))
            .expect("Failed to issue token");

        assert!(other.decode(&token).is_err());
    }

    #[test]
    fn test_decode_garbage() {
        let signer = TokenSigner::new(b"test_secret_key_at_least_32_bytes!");

        let result = signer.decode("not.a.token");
        assert!(matches!(result, Err(TokenError::DecodingFailed(_))));
    }

    #[test]
    fn test_decode_expired() {
        let signer = TokenSigner::new(b"test_secret_key_at_least_32_bytes!");

        let now = Utc::now().timestamp();
        let stale = Claims {
            username: "alice1".to_string(),
            iat: now - 2 * TOKEN_LIFETIME_SECS,
            exp: now - TOKEN_LIFETIME_SECS,
            iss: ISSUER.to_string(),
        };

        let token = signer.issue(&stale).expect("Failed to issue token");
        assert!(matches!(signer.decode(&token), Err(TokenError::Expired)));
    }
}
