//! JWT issuance and verification.
//!
//! Tokens are stateless: the signature over the full claim set is the only
//! thing verified, so there is no session table and no revocation list. The
//! `_at` variants take the current time explicitly, which keeps expiry
//! behavior testable without sleeping.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use courier_config::AuthConfig;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub iat: i64,    // Issued at
    pub exp: i64,    // Expiration time
    pub jti: String, // JWT ID
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,

    #[error("Token expired")]
    Expired,

    #[error("Token creation failed: {0}")]
    CreationFailed(String),
}

/// Issues and verifies signed, time-bounded identity tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    /// Create a token service from the auth configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            lifetime: Duration::minutes(config.token_lifetime_minutes as i64),
        }
    }

    /// Token validity window
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for a user, valid from now
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token valid from the given instant
    pub fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::CreationFailed(e.to_string()))
    }

    /// Verify a token against the current time and return its subject
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token against an explicit instant.
    ///
    /// A bad signature, tampered payload, or malformed subject is `Invalid`;
    /// a well-signed token past its `exp` is `Expired`. Expiry is checked
    /// here rather than by the library so the clock stays injectable.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<i64, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenError::Invalid)?;

        if now.timestamp() >= token_data.claims.exp {
            return Err(TokenError::Expired);
        }

        token_data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Invalid)
    }
}
